use axum::{
    Router,
    routing::{get, post},
};
use configuration::{AnalysisConfig, Config};
use datastore::SnapshotCache;
use injury_risk::{InjuryPredictor, RandomForestPredictor};
use plan_client::{OpenAiPlanGenerator, PlanGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod pages;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<SnapshotCache>,
    pub analysis: AnalysisConfig,
    /// `None` when the model artifact could not be loaded.
    pub predictor: Option<Arc<dyn InjuryPredictor>>,
    /// `None` when no API key is configured.
    pub planner: Option<Arc<dyn PlanGenerator>>,
}

impl AppState {
    /// Builds the state from configuration. The optional collaborators are
    /// disabled with a warning rather than failing startup.
    pub fn from_config(config: &Config) -> Self {
        let predictor = match RandomForestPredictor::load(&config.injury_model.path) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn InjuryPredictor>),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Injury risk model unavailable; predictions are disabled."
                );
                None
            }
        };
        let planner = match OpenAiPlanGenerator::from_env(&config.plan_generator) {
            Ok(generator) => Some(Arc::new(generator) as Arc<dyn PlanGenerator>),
            Err(e) => {
                tracing::warn!(error = %e, "Plan generator unavailable.");
                None
            }
        };
        Self {
            cache: Arc::new(SnapshotCache::new(&config.data)),
            analysis: config.analysis.clone(),
            predictor,
            planner,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/home", get(handlers::get_home))
        .route("/api/players", get(handlers::get_players))
        .route("/api/team-report", get(handlers::get_team_report))
        .route("/api/players/:name/report", get(handlers::get_player_report))
        .route("/api/injury-risk", post(handlers::post_injury_risk))
        .route("/api/plan", post(handlers::post_plan))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
