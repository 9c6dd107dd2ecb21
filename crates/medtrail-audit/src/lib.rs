//! Medtrail Audit - append-only, access-controlled audit trail.
//!
//! This crate provides:
//! - [`AuditTrail`]: records events from trusted writers and lets the
//!   administrator read them back
//! - [`AccessPolicy`]: the administrator and the writer allow-list
//! - [`Response`] and [`ErrorCode`]: the tagged `{ok}` / `{err}` results
//!   seen by calling components
//!
//! # Access Model
//!
//! Two gates, fixed when the trail is built:
//! - writes succeed if the immediate caller is on the writer allow-list or
//!   the transaction sender is the administrator;
//! - reads succeed only for the administrator.
//!
//! Authorization is checked before input validation, and input validation
//! before existence. A rejected call learns nothing about its input and
//! never consumes an event id.
//!
//! # Example
//!
//! ```
//! use medtrail_audit::{AccessPolicy, AuditError, AuditTrail, EventId};
//! use medtrail_core::{CallContext, Principal, Timestamp};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let admin: Principal = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".parse()?;
//! let registry: Principal = ".patient-identity".parse()?;
//! let patient: Principal = "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC".parse()?;
//!
//! let policy = AccessPolicy::new(admin.clone(), [registry.clone()]);
//! let mut trail = AuditTrail::in_memory(policy).await?;
//!
//! let now = Timestamp::from_secs(1_617_984_000);
//! let writer = CallContext::via_contract(patient.clone(), registry, now);
//! let id = trail.record(&writer, "REGISTER_PATIENT", "PATIENT123", patient).await?;
//! assert_eq!(id, EventId(0));
//!
//! // Writers cannot read back.
//! assert!(matches!(trail.fetch(&writer, id).await, Err(AuditError::Unauthorized)));
//!
//! let event = trail.fetch(&CallContext::direct(admin, now), id).await?;
//! assert_eq!(event.event_type, "REGISTER_PATIENT");
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
mod event;
mod policy;
mod response;
mod store;
mod trail;

pub use error::{AuditError, AuditResult, ErrorCode};
pub use event::{Event, EventDraft, EventId};
pub use policy::AccessPolicy;
pub use response::Response;
pub use store::EventStore;
pub use trail::AuditTrail;
