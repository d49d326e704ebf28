use serde::{Deserialize, Serialize};

/// The binary label produced by the injury risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    /// Maps the raw class label of the model (0 or 1) onto a risk level.
    pub fn from_label(label: i32) -> Option<Self> {
        match label {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// The advice shown next to the prediction.
    pub fn advice(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low injury risk. Keep up the great work.",
            RiskLevel::High => "High injury risk! Reduce intensity and prioritize recovery.",
        }
    }
}
