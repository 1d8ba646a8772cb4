//! Mapping of failures to HTTP responses.
//!
//! Every error leaves the service as `{"status": <code>, "message": "<text>"}`
//! with the same code on the response line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::ValidationError;
use crate::observability::metrics;
use crate::store::StoreError;

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Customer with id '{0}' was not found.")]
    CustomerNotFound(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    Timeout,

    /// Details are logged where the error is created, never returned.
    #[error("An internal error occurred; please try again later")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CustomerNotFound(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store failure, recording it against `operation` when it is not a plain miss.
    pub fn from_store(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::CustomerNotFound(id.to_string()),
            other => {
                tracing::error!(operation, error = %other, "Store operation failed");
                metrics::record_store_error(operation);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::info!(status = status.as_u16(), error = %self, "Request rejected");
        }
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::MissingField("name")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from_store("find", StoreError::NotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from_store("list", StoreError::Corrupt { id: 1, reason: "x".into() }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from_store("find", StoreError::NotFound(7));
        assert_eq!(err.to_string(), "Customer with id '7' was not found.");
    }

    #[test]
    fn test_internal_hides_cause() {
        let err = ApiError::from_store("create", StoreError::Corrupt { id: 1, reason: "secret".into() });
        assert!(!err.to_string().contains("secret"));
    }
}
