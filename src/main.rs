use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, DataOverrides, init_tracing, load_config};
use core_types::{DrillAllowList, parse_date};
use datastore::{Snapshot, SnapshotCache};
use indicatif::{ProgressBar, ProgressStyle};
use injury_risk::{InjuryFeatures, RandomForestPredictor, assess};
use plan_client::{OpenAiPlanGenerator, PlanGenerator, PlayerAttributes, render_to_pdf};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use web_server::{AppState, pages};

mod render;

/// The main entry point for the Pitchside dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The plan generator reads its API key from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    config.data.apply(cli.data);

    // Held until exit so buffered file logs are flushed.
    let _guard = init_tracing(&config.logging)?;
    tracing::debug!(?config, "Configuration loaded.");

    run(cli.command, config, cli.json).await
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sports-science dashboard for a football club's GPS and wellness data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    data: DataOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the club history page.
    Home,
    /// List the rostered players.
    Players,
    /// Team-level workload, drill and wellness report.
    TeamReport(TeamReportArgs),
    /// Individual report for one player.
    PlayerReport(PlayerReportArgs),
    /// Predict injury risk from explicit features or from a player's training day.
    PredictInjury(PredictInjuryArgs),
    /// Generate a personalised training, recovery and diet plan.
    Plan(PlanArgs),
    /// Serve the HTTP API.
    Serve(ServeArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the report (defaults to the first GPS session).
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last day of the report (defaults to the last GPS session).
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct TeamReportArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Drill to include; repeat for several. Defaults to the configured allow-list.
    #[arg(long = "drill")]
    drills: Vec<String>,
}

#[derive(Args)]
struct PlayerReportArgs {
    #[arg(long)]
    player: String,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Args)]
struct PredictInjuryArgs {
    /// Derive the features from this player's sessions on `--date`.
    #[arg(
        long,
        requires = "date",
        conflicts_with_all = [
            "total_distance",
            "metres_per_minute",
            "high_speed_running",
            "energy",
            "soreness",
            "stress",
        ]
    )]
    player: Option<String>,
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[arg(long)]
    total_distance: Option<f64>,
    #[arg(long)]
    metres_per_minute: Option<f64>,
    #[arg(long)]
    high_speed_running: Option<f64>,
    #[arg(long)]
    energy: Option<f64>,
    #[arg(long)]
    soreness: Option<f64>,
    #[arg(long)]
    stress: Option<f64>,
}

#[derive(Args)]
struct PlanArgs {
    /// Weight in kg.
    #[arg(long)]
    weight: f64,
    /// Height in cm.
    #[arg(long)]
    height: f64,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    energy: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    stress: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    sleep_quality: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    soreness: u8,
    /// Total distance in km.
    #[arg(long, default_value_t = 0.0)]
    total_distance: f64,
    /// High-speed running in km.
    #[arg(long, default_value_t = 0.0)]
    high_speed_running: f64,
    #[arg(long, default_value_t = 0)]
    minutes_per_session: u32,
    #[arg(long, default_value_t = 0)]
    sprints: u32,

    /// Also write the plan as a PDF.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    /// Overrides `[server].addr`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(command: Commands, config: Config, json: bool) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    match command {
        Commands::Home => {
            let page = pages::home_page();
            emit(json, &page, || render::home(&page))
        }
        Commands::Players => {
            let players = pages::player_listing(&load(&config)?);
            emit(json, &players, || render::players(&players))
        }
        Commands::TeamReport(args) => {
            let drills = if args.drills.is_empty() {
                config.analysis.drill_allow_list.clone()
            } else {
                DrillAllowList::new(args.drills)
            };
            let report =
                pages::team_page(&load(&config)?, args.range.from, args.range.to, drills, today);
            emit(json, &report, || render::team_report(&report))
        }
        Commands::PlayerReport(args) => {
            let snapshot = load(&config)?;
            let (from, to) = (args.range.from, args.range.to);
            let report = pages::player_page(&snapshot, &args.player, from, to, today)?;
            emit(json, &report, || render::player_report(&report))
        }
        Commands::PredictInjury(args) => handle_predict(args, &config, json),
        Commands::Plan(args) => handle_plan(args, &config, json).await,
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or(config.server.addr);
            web_server::run_server(addr, AppState::from_config(&config)).await
        }
    }
}

fn load(config: &Config) -> anyhow::Result<Snapshot> {
    SnapshotCache::new(&config.data)
        .snapshot()
        .context("failed to load the data files")
}

fn emit<T: serde::Serialize>(json: bool, value: &T, table: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        table();
    }
    Ok(())
}

fn handle_predict(args: PredictInjuryArgs, config: &Config, json: bool) -> anyhow::Result<()> {
    let features = match (args.player, args.date) {
        (Some(player), Some(date)) => {
            let snapshot = load(config)?;
            InjuryFeatures::from_session_day(&player, date, &snapshot.sessions, &snapshot.wellness)?
        }
        _ => {
            let require = |value: Option<f64>, flag: &str| {
                value.with_context(|| {
                    format!("--{flag} is required unless --player and --date are given")
                })
            };
            InjuryFeatures {
                total_distance: require(args.total_distance, "total-distance")?,
                metres_per_minute: require(args.metres_per_minute, "metres-per-minute")?,
                high_speed_running: require(args.high_speed_running, "high-speed-running")?,
                energy: require(args.energy, "energy")?,
                soreness: require(args.soreness, "soreness")?,
                stress: require(args.stress, "stress")?,
            }
        }
    };

    // Validate before touching the model file.
    features.to_vector()?;
    let predictor = RandomForestPredictor::load(&config.injury_model.path)?;
    let assessment = assess(&predictor, &features)?;
    emit(json, &assessment, || render::assessment(&assessment))
}

async fn handle_plan(args: PlanArgs, config: &Config, json: bool) -> anyhow::Result<()> {
    let attributes = PlayerAttributes {
        weight_kg: args.weight,
        height_cm: args.height,
        energy: args.energy,
        stress: args.stress,
        sleep_quality: args.sleep_quality,
        soreness: args.soreness,
        total_distance_km: args.total_distance,
        high_speed_running_km: args.high_speed_running,
        minutes_per_session: args.minutes_per_session,
        sprints: args.sprints,
    };
    let generator = OpenAiPlanGenerator::from_env(&config.plan_generator)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("invalid spinner template")?,
    );
    spinner.set_message(format!("Generating plan (BMI {:.2})...", attributes.bmi()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let plan = generator.generate(&attributes).await;
    spinner.finish_and_clear();
    let plan = plan?;

    if let Some(path) = &args.output {
        let pdf = render_to_pdf("Personalized Plan", &plan)?;
        std::fs::write(path, pdf).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Plan written.");
    }

    if json {
        let body = serde_json::json!({ "bmi": attributes.bmi(), "plan": plan });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{plan}");
    }
    Ok(())
}
