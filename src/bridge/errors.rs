//! # Bridge Errors
//!
//! Error types for the aggregation bridge. Every variant maps to the
//! machine code carried by an outbound `error` event.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Machine-readable code sent next to an `error` event message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    UpstreamFailure,
    InvalidMessage,
    Unsupported,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::UpstreamFailure => "UPSTREAM_FAILURE",
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::Unsupported => "UNSUPPORTED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Bridge errors
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    // ==================
    // Request Errors
    // ==================
    /// Requested brewery has no backing record
    #[error("Brewery {0} not found")]
    NotFound(u64),

    /// Client frame could not be decoded
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Client named an event the bridge does not handle
    #[error("Unsupported event: {0}")]
    Unsupported(String),

    // ==================
    // Upstream Errors
    // ==================
    /// Resource API answered with a non-success status
    #[error("Resource API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Resource API could not be reached
    #[error("Resource API unreachable: {0}")]
    Transport(String),

    /// Resource API answered with an unexpected body
    #[error("Unexpected Resource API response: {0}")]
    Decode(String),

    // ==================
    // Internal Errors
    // ==================
    /// Reply could not be serialized
    #[error("Could not encode reply: {0}")]
    Encode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Code carried by the outbound `error` event
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::NotFound(_) => ErrorCode::NotFound,
            BridgeError::InvalidMessage(_) => ErrorCode::InvalidMessage,
            BridgeError::Unsupported(_) => ErrorCode::Unsupported,
            BridgeError::Upstream { .. } | BridgeError::Transport(_) | BridgeError::Decode(_) => {
                ErrorCode::UpstreamFailure
            }
            BridgeError::Encode(_) | BridgeError::Config(_) => ErrorCode::Internal,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BridgeError::Decode(err.to_string())
        } else {
            BridgeError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BridgeError::NotFound(4).code(), ErrorCode::NotFound);
        assert_eq!(
            BridgeError::Upstream {
                status: 500,
                message: "boom".to_string()
            }
            .code(),
            ErrorCode::UpstreamFailure
        );
        assert_eq!(
            BridgeError::Transport("refused".to_string()).code(),
            ErrorCode::UpstreamFailure
        );
        assert_eq!(
            BridgeError::Unsupported("ping".to_string()).code(),
            ErrorCode::Unsupported
        );
        assert_eq!(
            BridgeError::Encode("key must be a string".to_string()).code(),
            ErrorCode::Internal
        );
    }

    #[test]
    fn test_code_serializes_screaming() {
        let json = serde_json::to_string(&ErrorCode::UpstreamFailure).unwrap();
        assert_eq!(json, "\"UPSTREAM_FAILURE\"");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    }

    #[test]
    fn test_not_found_message_names_id() {
        assert_eq!(BridgeError::NotFound(12).to_string(), "Brewery 12 not found");
    }
}
