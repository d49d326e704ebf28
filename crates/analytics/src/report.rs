use crate::metric::{Metric, Section};
use crate::rollup::{DrillRollup, PlayerDrillMatrix, PlayerRollup, SessionTotals};
use chrono::NaiveDate;
use core_types::{DateRange, WellnessRecord};
use serde::Serialize;

/// Percentage KPIs derived for one player in a team report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerKpis {
    /// Share of the whole window's distance.
    pub pct_total_distance: Metric,
    /// Against the fastest speed anyone reached in the window.
    pub pct_window_max_speed: Metric,
    /// Against the player's own in-game best from the roster.
    pub pct_season_max_speed: Metric,
    pub pct_max_game_total_distance: Metric,
    pub pct_max_game_high_speed_running: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    #[serde(flatten)]
    pub rollup: PlayerRollup,
    pub kpis: PlayerKpis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSpeed {
    pub player: String,
    pub max_speed: f64,
    pub session_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellnessAverage {
    pub player: String,
    pub entries: usize,
    pub mean_total_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: usize,
}

/// The team page: every section is computed independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamReport {
    pub range: DateRange,
    pub totals: Section<SessionTotals>,
    pub players: Section<Vec<PlayerSummary>>,
    pub drills: Section<Vec<DrillRollup>>,
    pub matrix: Section<PlayerDrillMatrix>,
    pub top_speed: Section<TopSpeed>,
    pub wellness: Section<Vec<WellnessAverage>>,
    pub activities: Section<Vec<ActivityCount>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player: String,
    pub position: String,
    pub age: i32,
    pub player_image: String,
    pub international_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHighlights {
    /// Mean high-speed running per GPS row.
    pub mean_high_speed_running: Option<f64>,
    pub mean_wellness_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionLine {
    pub session_date: NaiveDate,
    pub drill: String,
    pub total_distance: f64,
    pub high_speed_running: f64,
    pub session_minutes: f64,
}

/// Cumulative load in the window compared with the player's ceilings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadComparison {
    pub pct_max_game_high_speed_running: Metric,
    pub pct_max_game_total_distance: Metric,
    /// Against the largest single-row total distance in the window.
    pub pct_max_total_distance: Metric,
    /// Against the largest single-row high-speed running in the window.
    pub pct_max_high_speed_running: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The player page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub player: String,
    pub range: DateRange,
    pub profile: Section<PlayerProfile>,
    pub highlights: Section<PlayerHighlights>,
    pub sessions: Section<Vec<SessionLine>>,
    pub workload: Section<WorkloadComparison>,
    pub hsr_trend: Section<Vec<TrendPoint>>,
    pub energy_zscores: Section<Vec<TrendPoint>>,
    pub wellness: Section<Vec<WellnessRecord>>,
}
