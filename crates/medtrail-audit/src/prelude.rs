//! Prelude module - commonly used types for convenient import.
//!
//! Use `use medtrail_audit::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuditError, AuditResult, ErrorCode};

// Events
pub use crate::{Event, EventDraft, EventId};

// Trail and policy
pub use crate::{AccessPolicy, AuditTrail, Response};
