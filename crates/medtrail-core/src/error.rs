//! Core error types.

use thiserror::Error;

/// Errors raised while building core types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A principal string was rejected.
    #[error("invalid principal {value:?}: {reason}")]
    InvalidPrincipal {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp could not be represented.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
