//! Prelude module - commonly used test helpers.
//!
//! Use `use medtrail_test::prelude::*;` to import all essential helpers.

// Principals and contexts
pub use crate::fixtures::{
    BLOCK_TIME, administrator, at, direct, patient, patient_identity, provider,
    provider_verification, record_access, test_writers, unauthorized_contract,
};

// Harness
pub use crate::harness::{TestContext, setup_test_logging, test_dir};

// Mocks
pub use crate::mocks::FailingKvStore;
