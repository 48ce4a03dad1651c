//! HTTP Error Mapping
//!
//! Maps application errors to status codes and `{"error": ...}` bodies.

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobqueue_core::error::AppError;
use thiserror::Error;
use tracing::error;

/// Body of a 429: the submitter should retry later
pub const SATURATED_MESSAGE: &str = "queue saturated, try again later";

/// Body of a 400 for undecodable requests
pub const INVALID_JSON_MESSAGE: &str = "invalid json";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid json")]
    InvalidJson,

    #[error(transparent)]
    App(#[from] AppError),
}

/// Status code and client-facing message for an error
pub fn to_http_error(err: &ApiError) -> (StatusCode, String) {
    match err {
        ApiError::InvalidJson => (StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE.to_string()),
        ApiError::App(app) => match app {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Serialization(_) => {
                (StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE.to_string())
            }
            AppError::AdmissionRejected { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, SATURATED_MESSAGE.to_string())
            }
            AppError::Config(_) | AppError::Execution(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = to_http_error(&self);
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobqueue_core::domain::Phase;

    #[test]
    fn test_admission_rejected_is_429() {
        let err = ApiError::from(AppError::AdmissionRejected {
            phase: Phase::Dynamic,
            capacity: 3,
        });
        assert_eq!(
            to_http_error(&err),
            (StatusCode::TOO_MANY_REQUESTS, SATURATED_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::from(AppError::Internal("static queue is closed".into()));
        let (status, message) = to_http_error(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("closed"));
    }
}
