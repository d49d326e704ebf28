use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of speed zones reported by the GPS units.
pub const DISTANCE_ZONES: usize = 6;

/// Anything keyed by a player and a calendar date, so the same filters
/// apply to GPS sessions and wellness questionnaires.
pub trait PlayerRecord {
    fn player(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

/// One row of the GPS export: a player, a training day and one drill segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player: String,
    pub session_date: NaiveDate,
    pub drill: String,
    /// Metres.
    pub total_distance: f64,
    pub metres_per_minute: f64,
    pub max_speed: f64,
    pub explosive_distance: f64,
    pub session_minutes: f64,
    /// Distance covered in each speed zone, slowest first.
    pub zone_distances: [f64; DISTANCE_ZONES],
    /// Zone 5 + zone 6, derived when the file is loaded.
    pub high_speed_running: f64,
}

impl SessionRecord {
    /// High-speed running is the distance covered in the two fastest zones.
    pub fn derive_high_speed_running(zones: &[f64; DISTANCE_ZONES]) -> f64 {
        zones[DISTANCE_ZONES - 2] + zones[DISTANCE_ZONES - 1]
    }
}

impl PlayerRecord for SessionRecord {
    fn player(&self) -> &str {
        &self.player
    }

    fn date(&self) -> NaiveDate {
        self.session_date
    }
}

/// A daily wellness questionnaire. Every component is scored 0-10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessRecord {
    pub player: String,
    pub session_date: NaiveDate,
    pub energy: f64,
    pub soreness: f64,
    pub sleep_quality: f64,
    pub stress: f64,
    pub total_score: f64,
}

impl PlayerRecord for WellnessRecord {
    fn player(&self) -> &str {
        &self.player
    }

    fn date(&self) -> NaiveDate {
        self.session_date
    }
}

/// Static reference data for one squad member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: String,
    pub date_of_birth: NaiveDate,
    pub position: String,
    pub player_image: String,
    pub international_image: String,
    /// Best in-game high-speed running, in metres.
    pub max_game_high_speed_running: f64,
    /// Best in-game total distance, in metres.
    pub max_game_total_distance: f64,
    pub max_game_speed: Option<f64>,
}

impl RosterEntry {
    /// Age in completed years on the given day.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let dob = self.date_of_birth;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        age
    }
}

/// One scheduled activity from the club calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub activity: String,
}
