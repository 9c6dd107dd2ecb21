//! Medtrail Test - shared test utilities for the medtrail crates.
//!
//! Principal and context fixtures, temp-dir helpers, and a storage mock
//! whose commits can be made to fail. Use as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! medtrail-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use medtrail_test::{administrator, at, patient_identity, provider, test_writers};
//!
//! let policy = AccessPolicy::new(administrator(), test_writers());
//! let ctx = at(provider(), patient_identity());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
