//! Medtrail Telemetry - logging setup for the medtrail host.
//!
//! Library crates only emit `tracing` events. The host binary decides where
//! they go by building a [`LogConfig`] and calling [`setup_logging`] once.
//!
//! # Example
//!
//! ```rust,no_run
//! use medtrail_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), medtrail_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("medtrail_audit=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("host started");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_logging,
};
