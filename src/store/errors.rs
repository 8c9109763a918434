//! # Store Errors
//!
//! Error types for the resource store.

use thiserror::Error;

use super::models::RecordKind;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Resource store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No record with this id
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: u64 },

    /// A record references another record that does not exist
    #[error("{kind} {id} referenced but does not exist")]
    MissingReference { kind: RecordKind, id: u64 },

    /// Unique constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before reaching storage
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Counter store unavailable
    #[error("Counter store unavailable: {0}")]
    CounterUnavailable(String),

    /// Lock poisoned or similar internal failure
    #[error("Storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Shorthand for a missing record
    pub fn not_found(kind: RecordKind, id: u64) -> Self {
        StoreError::NotFound { kind, id }
    }

    pub(crate) fn poisoned() -> Self {
        StoreError::Internal("Lock poisoned".to_string())
    }
}
