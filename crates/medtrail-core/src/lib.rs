//! Medtrail Core - shared types for the medtrail audit trail.
//!
//! This crate provides:
//! - [`Principal`]: a validated identity recognized by the host environment
//! - [`CallContext`]: the caller identities and block time of one invocation
//! - [`Timestamp`] and the [`Clock`] trait for hosts that supply block time
//!
//! Nothing here reads ambient state. The host builds a [`CallContext`] for
//! every call and hands it to the component explicitly.
//!
//! # Example
//!
//! ```
//! use medtrail_core::{CallContext, Principal, Timestamp};
//!
//! let admin: Principal = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".parse().unwrap();
//! let registry: Principal = ".patient-identity".parse().unwrap();
//!
//! let ctx = CallContext::via_contract(admin.clone(), registry, Timestamp::from_secs(1_617_984_000));
//! assert_eq!(ctx.tx_sender, admin);
//! assert!(ctx.contract_caller.is_contract());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod clock;
mod context;
mod error;
mod principal;

pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use context::CallContext;
pub use error::{CoreError, CoreResult};
pub use principal::{MAX_PRINCIPAL_LEN, Principal};
