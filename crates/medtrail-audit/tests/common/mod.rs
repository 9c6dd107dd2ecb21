//! Shared builders for audit trail integration tests.

use std::sync::Arc;

use medtrail_audit::{AccessPolicy, AuditTrail};
use medtrail_storage::KvStore;
use medtrail_test::{administrator, test_writers};

/// Administrator plus the three registry contracts.
#[allow(dead_code)]
pub fn test_policy() -> AccessPolicy {
    AccessPolicy::new(administrator(), test_writers())
}

/// A fresh in-memory trail under [`test_policy`].
#[allow(dead_code)]
pub async fn test_trail() -> AuditTrail {
    AuditTrail::in_memory(test_policy())
        .await
        .expect("in-memory trail opens")
}

/// A trail under [`test_policy`] over the given store.
#[allow(dead_code)]
pub async fn trail_over(store: Arc<dyn KvStore>) -> AuditTrail {
    AuditTrail::open(test_policy(), store)
        .await
        .expect("trail opens")
}
