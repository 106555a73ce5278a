//! HTTP error handling and response types.
//!
//! Every failure leaves the server as `{"status": "error", "message": ...}`.
//! Internal details are logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::ErrorEnvelope;
use crate::db::repository::RepositoryError;
use crate::services::query_params::ValidationError;

pub const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred on the server. Please try again later or contact support if the issue persists.";

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No route matched; carries the closest known route, if any
    NotFound { suggestion: Option<String> },
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// Panic caught by the middleware
    Unexpected(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Repository(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message for this error.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound { suggestion } => {
                let hint = suggestion
                    .as_ref()
                    .map(|route| format!("Did you mean {}?", route))
                    .unwrap_or_default();
                format!(
                    "The endpoint you requested could not be found. {} Please check our documentation for more details.",
                    hint
                )
            }
            AppError::BadRequest(detail) => format!(
                "One or more fields in the request failed validation. Please review and correct your input: {}.",
                detail
            ),
            AppError::Internal(_) | AppError::Repository(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            AppError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(detail) => tracing::error!("Internal Server Error: {}", detail),
            AppError::Repository(e) => tracing::error!("Internal Server Error: {}", e),
            AppError::Unexpected(detail) => {
                tracing::error!("General Error: An unexpected error occurred. {}", detail)
            }
            AppError::BadRequest(detail) => tracing::debug!("Bad request: {}", detail),
            AppError::NotFound { .. } => {}
        }

        let status = self.status_code();
        (status, Json(ErrorEnvelope::new(self.message()))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Internal(format!("CSV serialization failed: {}", err))
    }
}
