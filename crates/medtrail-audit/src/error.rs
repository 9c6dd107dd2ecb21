//! Audit trail error types.

use medtrail_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable numeric codes returned to callers of the audit trail.
///
/// Code `2` is reserved and never produced by these operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum ErrorCode {
    /// The caller is not permitted to perform the operation.
    Unauthorized = 1,
    /// No event exists under the requested id.
    NotFound = 3,
    /// The request was malformed.
    InvalidInput = 4,
}

impl ErrorCode {
    /// The numeric value of this code.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.as_u32()
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unauthorized),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::InvalidInput),
            other => Err(format!("unknown audit error code {other}")),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Errors that can occur with the audit trail.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Caller failed the operation's authorization check.
    #[error("unauthorized")]
    Unauthorized,

    /// No event under this id.
    #[error("audit event not found: {event_id}")]
    NotFound {
        /// The id that was requested.
        event_id: u64,
    },

    /// The request failed validation.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with it.
        reason: String,
    },

    /// The event counter cannot advance any further.
    #[error("event counter exhausted")]
    CounterOverflow,

    /// The id about to be assigned already holds an event.
    ///
    /// Stored events are never overwritten; the append is refused instead.
    #[error("audit event {event_id} already exists")]
    IdConflict {
        /// The id that was already taken.
        event_id: u64,
    },

    /// Stored data could not be decoded.
    #[error("corrupted audit data at {key}: {reason}")]
    Corrupted {
        /// Storage key that failed to decode.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// Host storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuditError {
    /// The stable code for contract-level failures.
    ///
    /// Host infrastructure failures have no code; they abort the call
    /// without a contract result.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Unauthorized => Some(ErrorCode::Unauthorized),
            Self::NotFound { .. } => Some(ErrorCode::NotFound),
            Self::InvalidInput { .. } => Some(ErrorCode::InvalidInput),
            Self::CounterOverflow
            | Self::IdConflict { .. }
            | Self::Corrupted { .. }
            | Self::Storage(_) => None,
        }
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
