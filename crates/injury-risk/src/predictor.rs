use crate::error::InjuryRiskError;
use crate::features::{FeatureVector, InjuryFeatures};
use core_types::RiskLevel;
use serde::Serialize;

/// Anything that can classify a validated feature row.
///
/// Implementations only ever see vectors that passed `InjuryFeatures::to_vector`.
pub trait InjuryPredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<RiskLevel, InjuryRiskError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk: RiskLevel,
    pub advice: &'static str,
    pub features: InjuryFeatures,
}

/// Validates the features, then asks the predictor.
#[tracing::instrument(name = "injury_risk_assess", skip_all)]
pub fn assess(
    predictor: &dyn InjuryPredictor,
    features: &InjuryFeatures,
) -> Result<RiskAssessment, InjuryRiskError> {
    let vector = features.to_vector()?;
    let risk = predictor.predict(&vector)?;
    tracing::info!(?risk, "Injury risk assessed.");
    Ok(RiskAssessment {
        risk,
        advice: risk.advice(),
        features: features.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Flags high risk above a fixed total distance and counts its calls.
    struct ThresholdPredictor {
        threshold: f64,
        calls: AtomicUsize,
    }

    impl InjuryPredictor for ThresholdPredictor {
        fn predict(&self, features: &FeatureVector) -> Result<RiskLevel, InjuryRiskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if features.as_slice()[0] > self.threshold {
                RiskLevel::High
            } else {
                RiskLevel::Low
            })
        }
    }

    fn features(total_distance: f64, soreness: f64) -> InjuryFeatures {
        InjuryFeatures {
            total_distance,
            metres_per_minute: 85.0,
            high_speed_running: 250.0,
            energy: 6.0,
            soreness,
            stress: 4.0,
        }
    }

    #[test]
    fn assessment_carries_risk_and_advice() {
        let predictor = ThresholdPredictor {
            threshold: 8000.0,
            calls: AtomicUsize::new(0),
        };
        let high = assess(&predictor, &features(9000.0, 3.0)).unwrap();
        assert_eq!(high.risk, RiskLevel::High);
        assert!(high.advice.starts_with("High injury risk"));
        let low = assess(&predictor, &features(4000.0, 3.0)).unwrap();
        assert_eq!(low.risk, RiskLevel::Low);
    }

    #[test]
    fn predictor_is_never_called_with_invalid_input() {
        let predictor = ThresholdPredictor {
            threshold: 8000.0,
            calls: AtomicUsize::new(0),
        };
        let result = assess(&predictor, &features(4000.0, 12.0));
        assert!(matches!(result, Err(InjuryRiskError::PredictorInput { feature: "soreness", .. })));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }
}
