use crate::error::InjuryRiskError;
use chrono::NaiveDate;
use core_types::{SessionRecord, WellnessRecord};
use serde::{Deserialize, Serialize};

/// Version tag a model artifact must carry to be accepted.
pub const CONTRACT_VERSION: &str = "injury-risk/v1";

/// Feature order expected by the classifier.
pub const FEATURE_NAMES: [&str; 6] = [
    "total_distance",
    "metres_per_minute",
    "high_speed_running",
    "energy",
    "soreness",
    "stress",
];

const WELLNESS_SCALE: (f64, f64) = (0.0, 10.0);

/// The inputs of one prediction, as entered by a user or derived from a training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryFeatures {
    /// Metres.
    pub total_distance: f64,
    pub metres_per_minute: f64,
    /// Metres in the two fastest zones.
    pub high_speed_running: f64,
    pub energy: f64,
    pub soreness: f64,
    pub stress: f64,
}

/// A feature row that has passed validation, laid out in `FEATURE_NAMES` order.
///
/// Only `InjuryFeatures::to_vector` can build one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_NAMES.len()]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_row(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl InjuryFeatures {
    /// Validates every feature and lays them out in contract order.
    pub fn to_vector(&self) -> Result<FeatureVector, InjuryRiskError> {
        let values = [
            self.total_distance,
            self.metres_per_minute,
            self.high_speed_running,
            self.energy,
            self.soreness,
            self.stress,
        ];
        for (name, value) in FEATURE_NAMES.into_iter().zip(values) {
            check(name, value)?;
        }
        Ok(FeatureVector(values))
    }

    /// Builds the features for one player on one day from the loaded tables.
    ///
    /// Distance and high-speed running are summed over the day's drills,
    /// metres per minute is their mean. The wellness components come from that
    /// day's questionnaire; if there are several, the last one wins.
    pub fn from_session_day(
        player: &str,
        date: NaiveDate,
        sessions: &[SessionRecord],
        wellness: &[WellnessRecord],
    ) -> Result<Self, InjuryRiskError> {
        let day: Vec<&SessionRecord> = sessions
            .iter()
            .filter(|s| s.player == player && s.session_date == date)
            .collect();
        if day.is_empty() {
            return Err(InjuryRiskError::MissingData(format!(
                "no GPS rows for {player} on {date}"
            )));
        }
        let questionnaire = wellness
            .iter()
            .filter(|w| w.player == player && w.session_date == date)
            .last()
            .ok_or_else(|| {
                InjuryRiskError::MissingData(format!("no wellness entry for {player} on {date}"))
            })?;

        let total_distance = day.iter().map(|s| s.total_distance).sum();
        let high_speed_running = day.iter().map(|s| s.high_speed_running).sum();
        let metres_per_minute =
            day.iter().map(|s| s.metres_per_minute).sum::<f64>() / day.len() as f64;

        Ok(Self {
            total_distance,
            metres_per_minute,
            high_speed_running,
            energy: questionnaire.energy,
            soreness: questionnaire.soreness,
            stress: questionnaire.stress,
        })
    }
}

fn check(feature: &'static str, value: f64) -> Result<(), InjuryRiskError> {
    let invalid = |reason: String| InjuryRiskError::PredictorInput { feature, reason };
    if !value.is_finite() {
        return Err(invalid(format!("{value} is not a finite number")));
    }
    if value < 0.0 {
        return Err(invalid(format!("{value} is negative")));
    }
    let is_wellness = matches!(feature, "energy" | "soreness" | "stress");
    if is_wellness && !(WELLNESS_SCALE.0..=WELLNESS_SCALE.1).contains(&value) {
        return Err(invalid(format!(
            "{value} is outside the {}-{} wellness scale",
            WELLNESS_SCALE.0, WELLNESS_SCALE.1
        )));
    }
    Ok(())
}
