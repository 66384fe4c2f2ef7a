//! Error types and handling
//!
//! Common error types used across the server, plus their mapping onto
//! HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::subtitle::encoder::EncodeError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Subtitle encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status this error is surfaced as
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response for clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        let code = match error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Encoding(_) => "ENCODING_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        ErrorResponse::from(&error)
    }
}

/// Body sent for every failed request. `payload` is always null so clients
/// can branch on it the same way they do for successful responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    payload: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Absent resources are an expected outcome, not something to report.
        let error = match &self {
            AppError::NotFound(what) => {
                tracing::debug!("Resource not found: {}", what);
                None
            }
            AppError::InvalidInput(_) => Some(ErrorResponse::from(&self)),
            _ => {
                tracing::error!("Request failed: {}", self);
                Some(ErrorResponse::from(&self))
            }
        };

        (
            status,
            Json(ErrorBody {
                payload: None,
                error,
            }),
        )
            .into_response()
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("record x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("page".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Store("locked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Encoding(EncodeError::Persist("disk full".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_codes() {
        let response = ErrorResponse::from(AppError::InvalidInput("pageSize".into()));
        assert_eq!(response.code, "INVALID_INPUT");
        assert!(response.message.contains("pageSize"));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let response = ErrorResponse::from(AppError::from(io));
        assert_eq!(response.code, "IO_ERROR");
    }
}
