use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use injury_risk::InjuryRiskError;
use plan_client::PlanError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data source error: {0}")]
    DataSource(#[from] datastore::DataSourceError),
    #[error("Injury risk error: {0}")]
    InjuryRisk(#[from] InjuryRiskError),
    #[error("Plan generation error: {0}")]
    Plan(#[from] PlanError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataSource(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InjuryRisk(InjuryRiskError::PredictorInput { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::InjuryRisk(InjuryRiskError::MissingData(_)) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::InjuryRisk(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Plan(PlanError::Pdf(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Plan(PlanError::MissingApiKey(_)) | AppError::Unavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Plan(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
        } else {
            tracing::debug!(error = %self, "Request rejected.");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
