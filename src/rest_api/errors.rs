//! # REST API Errors
//!
//! Error types for the REST API module. Every error renders as a JSON
//! body with an `error` field and the numeric status.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Path segment is not a valid id
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Invalid request body
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Origin not in the allow-list
    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidId(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Conflict(_) => StatusCode::CONFLICT,
            RestError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RestError::NotFound(err.to_string()),
            StoreError::MissingReference { .. } | StoreError::Invalid(_) => {
                RestError::InvalidBody(err.to_string())
            }
            StoreError::Conflict(msg) => RestError::Conflict(msg),
            StoreError::HashingFailed
            | StoreError::CounterUnavailable(_)
            | StoreError::Internal(_) => RestError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::InvalidBody(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordKind;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidQueryParam("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestError::OriginNotAllowed("http://evil".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RestError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let err = RestError::from(StoreError::not_found(RecordKind::Brewery, 3));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Brewery 3 not found");

        let err = RestError::from(StoreError::Conflict("dup".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = RestError::from(StoreError::Invalid("short".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse::from(RestError::NotFound("Brewery 1 not found".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Brewery 1 not found");
        assert_eq!(json["code"], 404);
    }
}
