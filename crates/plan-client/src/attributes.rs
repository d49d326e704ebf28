use serde::{Deserialize, Serialize};

/// What a coach enters about a player before asking for a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub energy: u8,
    pub stress: u8,
    pub sleep_quality: u8,
    pub soreness: u8,
    pub total_distance_km: f64,
    pub high_speed_running_km: f64,
    pub minutes_per_session: u32,
    pub sprints: u32,
}

impl PlayerAttributes {
    /// Body mass index, or 0 when weight or height is not positive.
    pub fn bmi(&self) -> f64 {
        if self.weight_kg > 0.0 && self.height_cm > 0.0 {
            let metres = self.height_cm / 100.0;
            self.weight_kg / (metres * metres)
        } else {
            0.0
        }
    }
}
