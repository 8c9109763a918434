//! CLI-specific error types
//!
//! Every CLI error is fatal: it is printed and the process exits non-zero.

use std::fmt;
use std::io;

use crate::bridge::BridgeError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (bind, stdout)
    IoError,
    /// Server failed to start or stopped with an error
    ServeFailed,
    /// Probe could not complete
    ProbeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "UBEERS_CLI_CONFIG_ERROR",
            Self::IoError => "UBEERS_CLI_IO_ERROR",
            Self::ServeFailed => "UBEERS_CLI_SERVE_FAILED",
            Self::ProbeFailed => "UBEERS_CLI_PROBE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Serve failed
    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Probe failed
    pub fn probe_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ProbeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<BridgeError> for CliError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::Config(msg) => Self::config_error(msg),
            other => Self::serve_failed(other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad port");
        assert_eq!(err.to_string(), "UBEERS_CLI_CONFIG_ERROR: bad port");
        assert_eq!(err.message(), "bad port");
    }

    #[test]
    fn test_bridge_config_error_maps_to_config() {
        let err = CliError::from(BridgeError::Config("cap".to_string()));
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
