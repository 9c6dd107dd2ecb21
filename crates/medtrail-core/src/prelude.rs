//! Prelude module - commonly used types for convenient import.
//!
//! Use `use medtrail_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Identity
pub use crate::Principal;

// Call context and time
pub use crate::{CallContext, Clock, FixedClock, SystemClock, Timestamp};
