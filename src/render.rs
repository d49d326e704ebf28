//! Terminal rendering of pages and reports.

use analytics::report::{PlayerReport, TeamReport};
use analytics::{Metric, Section};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use injury_risk::RiskAssessment;
use web_server::pages::{HomePage, PlayerListing};

fn table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

fn metric(value: &Metric) -> String {
    value.to_string()
}

/// Prints a section heading and either its body or its state.
fn section<T>(title: &str, section: &Section<T>, body: impl FnOnce(&T)) {
    println!("\n== {title} ==");
    match section {
        Section::Ready(data) => body(data),
        Section::NoData => println!("no data"),
        Section::NotApplicable(reason) => println!("n/a ({reason})"),
        Section::Failed(reason) => println!("unavailable: {reason}"),
    }
}

pub fn home(page: &HomePage) {
    println!("== Club History ==");
    for paragraph in page.history {
        println!("\n{paragraph}");
    }
    let mut achievements = table(["Achievement", "Count"]);
    for achievement in page.achievements {
        achievements.add_row(vec![achievement.title.to_string(), achievement.count.to_string()]);
    }
    println!("\n{achievements}");
}

pub fn players(players: &[PlayerListing]) {
    let mut out = table(["Player", "Position"]);
    for p in players {
        out.add_row(vec![p.player.clone(), p.position.clone()]);
    }
    println!("{out}");
}

pub fn team_report(report: &TeamReport) {
    println!("Team report {} to {}", report.range.start, report.range.end);

    section("Totals", &report.totals, |t| {
        println!(
            "rows: {}  total distance: {:.0} m  mean m/min: {}  max speed: {}",
            t.rows,
            t.total_distance,
            opt(t.mean_metres_per_minute),
            opt(t.max_speed)
        );
    });

    section("Players", &report.players, |players| {
        let mut out = table([
            "Player",
            "Rows",
            "Distance (m)",
            "HSR (m)",
            "Max speed",
            "% team distance",
            "% window max speed",
            "% season max speed",
            "% max game distance",
            "% max game HSR",
        ]);
        for p in players {
            out.add_row(vec![
                p.rollup.player.clone(),
                p.rollup.rows.to_string(),
                format!("{:.0}", p.rollup.total_distance),
                format!("{:.0}", p.rollup.high_speed_running),
                opt(p.rollup.max_speed),
                metric(&p.kpis.pct_total_distance),
                metric(&p.kpis.pct_window_max_speed),
                metric(&p.kpis.pct_season_max_speed),
                metric(&p.kpis.pct_max_game_total_distance),
                metric(&p.kpis.pct_max_game_high_speed_running),
            ]);
        }
        println!("{out}");
    });

    section("Drills", &report.drills, |drills| {
        let mut out = table(["Drill", "Rows", "Distance (m)", "Mean m/min", "Max speed"]);
        for d in drills {
            out.add_row(vec![
                d.drill.clone(),
                d.rows.to_string(),
                format!("{:.0}", d.total_distance),
                opt(d.mean_metres_per_minute),
                opt(d.max_speed),
            ]);
        }
        println!("{out}");
    });

    section("Distance by player and drill", &report.matrix, |matrix| {
        let mut header = vec!["Player".to_string()];
        header.extend(matrix.drills.iter().cloned());
        let mut out = Table::new();
        out.load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        for player in &matrix.players {
            let mut row = vec![player.clone()];
            row.extend(matrix.drills.iter().map(|drill| {
                matrix
                    .cell(player, drill)
                    .map_or_else(|| "-".to_string(), |c| format!("{:.0}", c.total_distance))
            }));
            out.add_row(row);
        }
        println!("{out}");
    });

    section("Top speed", &report.top_speed, |top| {
        println!("{} reached {:.1} on {}", top.player, top.max_speed, top.session_date);
    });

    section("Wellness", &report.wellness, |rows| {
        let mut out = table(["Player", "Entries", "Mean total score"]);
        for w in rows {
            out.add_row(vec![
                w.player.clone(),
                w.entries.to_string(),
                format!("{:.1}", w.mean_total_score),
            ]);
        }
        println!("{out}");
    });

    section("Calendar", &report.activities, |activities| {
        let mut out = table(["Activity", "Days"]);
        for a in activities {
            out.add_row(vec![a.activity.clone(), a.count.to_string()]);
        }
        println!("{out}");
    });
}

pub fn player_report(report: &PlayerReport) {
    println!(
        "Player report for {} from {} to {}",
        report.player, report.range.start, report.range.end
    );

    section("Profile", &report.profile, |p| {
        println!("{} ({}), age {}", p.player, p.position, p.age);
    });

    section("Highlights", &report.highlights, |h| {
        println!(
            "mean HSR per session: {}  mean wellness score: {}",
            opt(h.mean_high_speed_running),
            opt(h.mean_wellness_score)
        );
    });

    section("Workload", &report.workload, |w| {
        let mut out = table(["Comparison", "Value"]);
        out.add_row(vec![
            "% of max game HSR".to_string(),
            metric(&w.pct_max_game_high_speed_running),
        ]);
        out.add_row(vec![
            "% of max game distance".to_string(),
            metric(&w.pct_max_game_total_distance),
        ]);
        out.add_row(vec![
            "% of max session distance".to_string(),
            metric(&w.pct_max_total_distance),
        ]);
        out.add_row(vec![
            "% of max session HSR".to_string(),
            metric(&w.pct_max_high_speed_running),
        ]);
        println!("{out}");
    });

    section("Sessions", &report.sessions, |lines| {
        let mut out = table(["Date", "Drill", "Distance (m)", "HSR (m)", "Minutes"]);
        for l in lines {
            out.add_row(vec![
                l.session_date.to_string(),
                l.drill.clone(),
                format!("{:.0}", l.total_distance),
                format!("{:.0}", l.high_speed_running),
                format!("{:.0}", l.session_minutes),
            ]);
        }
        println!("{out}");
    });

    section("HSR trend", &report.hsr_trend, |points| {
        for p in points {
            println!("{}  {:.0}", p.date, p.value);
        }
    });

    section("Energy z-score", &report.energy_zscores, |points| {
        for p in points {
            println!("{}  {:+.2}", p.date, p.value);
        }
    });

    section("Wellness", &report.wellness, |rows| {
        let mut out = table(["Date", "Energy", "Soreness", "Sleep", "Stress", "Total"]);
        for w in rows {
            out.add_row(vec![
                w.session_date.to_string(),
                w.energy.to_string(),
                w.soreness.to_string(),
                w.sleep_quality.to_string(),
                w.stress.to_string(),
                w.total_score.to_string(),
            ]);
        }
        println!("{out}");
    });
}

pub fn assessment(assessment: &RiskAssessment) {
    println!("{:?} risk: {}", assessment.risk, assessment.advice);
}
