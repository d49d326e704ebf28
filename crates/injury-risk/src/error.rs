use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InjuryRiskError {
    #[error("Invalid predictor input for '{feature}': {reason}")]
    PredictorInput {
        feature: &'static str,
        reason: String,
    },

    #[error("Failed to read model artifact at {path:?}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode model artifact at {path:?}: {message}")]
    ArtifactDecode { path: PathBuf, message: String },

    #[error("Model artifact does not match the feature contract: {0}")]
    ContractMismatch(String),

    #[error("No data to build features from: {0}")]
    MissingData(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}
