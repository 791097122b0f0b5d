//! Error types for the task assist service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Assist Error Enum ==
/// Unified error type for the assist service.
///
/// Feature functions convert every variant into a degraded result before
/// returning to callers; only the HTTP layer ever renders these directly.
#[derive(Error, Debug)]
pub enum AssistError {
    /// The remote text-generation call failed and no fallback was supplied
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Response text did not have the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// A parsed answer is not a member of the valid domain set
    #[error("Validation error: {0}")]
    Validation(String),

    /// The task source could not be read
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        AssistError::Parse(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AssistError {
    fn into_response(self) -> Response {
        let status = match &self {
            AssistError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AssistError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AssistError::Parse(_)
            | AssistError::Validation(_)
            | AssistError::Storage(_)
            | AssistError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the assist service.
pub type Result<T> = std::result::Result<T, AssistError>;
