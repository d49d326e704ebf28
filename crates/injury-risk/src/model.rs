use crate::error::InjuryRiskError;
use crate::features::{CONTRACT_VERSION, FEATURE_NAMES, FeatureVector};
use crate::predictor::InjuryPredictor;
use core_types::RiskLevel;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub type Classifier = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Metadata stored next to the classifier in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub contract_version: String,
    pub feature_names: Vec<String>,
    pub n_samples: usize,
    pub trained_on: Option<String>,
}

impl ModelCard {
    /// The artifact must describe exactly the features we send, in the same order.
    fn verify(&self) -> Result<(), InjuryRiskError> {
        if self.contract_version != CONTRACT_VERSION {
            return Err(InjuryRiskError::ContractMismatch(format!(
                "artifact is '{}', expected '{CONTRACT_VERSION}'",
                self.contract_version
            )));
        }
        if !self.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES) {
            return Err(InjuryRiskError::ContractMismatch(format!(
                "artifact features {:?} differ from {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        Ok(())
    }
}

// The on-disk layout of a model artifact.
type ModelArtifact = (Classifier, ModelCard);

/// A smartcore random forest loaded from a bincode artifact.
pub struct RandomForestPredictor {
    model: Classifier,
    card: ModelCard,
}

impl std::fmt::Debug for RandomForestPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomForestPredictor")
            .field("card", &self.card)
            .finish_non_exhaustive()
    }
}

impl RandomForestPredictor {
    /// Loads and verifies a serialized `(classifier, ModelCard)` artifact.
    pub fn load(path: &Path) -> Result<Self, InjuryRiskError> {
        let file = File::open(path).map_err(|source| InjuryRiskError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;

        let (model, card): ModelArtifact = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| InjuryRiskError::ArtifactDecode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        card.verify()?;

        tracing::info!(
            path = %path.display(),
            contract = %card.contract_version,
            n_samples = card.n_samples,
            "Loaded injury risk model."
        );
        Ok(Self { model, card })
    }

    pub fn card(&self) -> &ModelCard {
        &self.card
    }
}

impl InjuryPredictor for RandomForestPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<RiskLevel, InjuryRiskError> {
        let x = DenseMatrix::from_2d_vec(&vec![features.to_row()])
            .map_err(|e| InjuryRiskError::Prediction(e.to_string()))?;
        let prediction = self
            .model
            .predict(&x)
            .map_err(|e| InjuryRiskError::Prediction(e.to_string()))?;
        let label = prediction
            .first()
            .copied()
            .ok_or_else(|| InjuryRiskError::Prediction("model returned no label".to_string()))?;
        RiskLevel::from_label(label)
            .ok_or_else(|| InjuryRiskError::Prediction(format!("unexpected class label {label}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::InjuryFeatures;
    use smartcore::ensemble::random_forest_classifier::RandomForestClassifierParameters;
    use std::io::BufWriter;
    use tempfile::tempdir;

    fn current_card(n_samples: usize) -> ModelCard {
        ModelCard {
            contract_version: CONTRACT_VERSION.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            n_samples,
            trained_on: None,
        }
    }

    // Same layout the external trainer writes.
    fn write_artifact(path: &Path, model: &Classifier, card: &ModelCard) {
        let file = File::create(path).unwrap();
        bincode::serialize_into(BufWriter::new(file), &(model, card)).unwrap();
    }

    fn train() -> Classifier {
        let rows = vec![
            vec![3000.0, 70.0, 100.0, 8.0, 2.0, 2.0],
            vec![3500.0, 75.0, 120.0, 7.0, 3.0, 2.0],
            vec![4000.0, 80.0, 150.0, 8.0, 2.0, 3.0],
            vec![3200.0, 72.0, 110.0, 9.0, 1.0, 1.0],
            vec![9000.0, 120.0, 900.0, 3.0, 8.0, 8.0],
            vec![9500.0, 125.0, 950.0, 2.0, 9.0, 7.0],
            vec![8800.0, 118.0, 870.0, 3.0, 8.0, 9.0],
            vec![9200.0, 122.0, 920.0, 2.0, 9.0, 8.0],
        ];
        let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
        let x = DenseMatrix::from_2d_vec(&rows).unwrap();
        RandomForestClassifier::fit(
            &x,
            &labels,
            RandomForestClassifierParameters::default().with_n_trees(10),
        )
        .unwrap()
    }

    #[test]
    fn artifact_round_trips_and_predicts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("injury.bin");
        write_artifact(&path, &train(), &current_card(8));

        let predictor = RandomForestPredictor::load(&path).unwrap();
        assert_eq!(predictor.card().contract_version, CONTRACT_VERSION);

        let features = InjuryFeatures {
            total_distance: 3300.0,
            metres_per_minute: 73.0,
            high_speed_running: 115.0,
            energy: 8.0,
            soreness: 2.0,
            stress: 2.0,
        };
        assert!(predictor.predict(&features.to_vector().unwrap()).is_ok());
    }

    #[test]
    fn artifact_with_other_features_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("injury.bin");
        let mut card = current_card(8);
        card.feature_names.push("performance_drop".to_string());
        write_artifact(&path, &train(), &card);

        assert!(matches!(
            RandomForestPredictor::load(&path),
            Err(InjuryRiskError::ContractMismatch(_))
        ));
    }

    #[test]
    fn artifact_with_other_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("injury.bin");
        let card = ModelCard {
            contract_version: "injury-risk/v0".into(),
            ..current_card(8)
        };
        write_artifact(&path, &train(), &card);
        assert!(matches!(
            RandomForestPredictor::load(&path),
            Err(InjuryRiskError::ContractMismatch(_))
        ));
    }

    #[test]
    fn missing_or_corrupt_artifacts_are_reported() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RandomForestPredictor::load(&dir.path().join("absent.bin")),
            Err(InjuryRiskError::ArtifactIo { .. })
        ));
        let garbage = dir.path().join("garbage.bin");
        std::fs::write(&garbage, b"not a model").unwrap();
        assert!(matches!(
            RandomForestPredictor::load(&garbage),
            Err(InjuryRiskError::ArtifactDecode { .. })
        ));
    }
}
