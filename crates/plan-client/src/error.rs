use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan generator is not configured: environment variable '{0}' is not set.")]
    MissingApiKey(String),

    #[error("Chat completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The language model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The language model returned no plan.")]
    EmptyResponse,

    #[error("Failed to render the plan as PDF: {0}")]
    Pdf(String),
}
