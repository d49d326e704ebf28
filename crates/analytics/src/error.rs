use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No rows matched the selection: {0}")]
    EmptySelection(String),

    #[error("Metric '{metric}' is undefined because its denominator is zero or missing")]
    DivisionUndefined { metric: String },

    #[error("Player '{0}' is not in the roster")]
    UnknownPlayer(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
