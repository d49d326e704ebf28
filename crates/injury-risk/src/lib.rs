//! # Injury Risk
//!
//! Consumer side of the injury risk classifier. The model itself is trained
//! elsewhere; this crate pins the feature contract it expects, validates inputs
//! against it and loads the serialized classifier.
//!
//! - `features`: the `injury-risk/v1` contract, `InjuryFeatures` and the validated `FeatureVector`.
//! - `predictor`: the `InjuryPredictor` trait and `assess`, which never calls a predictor
//!   with invalid input.
//! - `model`: the smartcore random forest artifact loader.

pub mod error;
pub mod features;
pub mod model;
pub mod predictor;

pub use error::InjuryRiskError;
pub use features::{CONTRACT_VERSION, FEATURE_NAMES, FeatureVector, InjuryFeatures};
pub use model::{ModelCard, RandomForestPredictor};
pub use predictor::{InjuryPredictor, RiskAssessment, assess};
