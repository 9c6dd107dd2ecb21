//! Who may write and who may read.

use medtrail_core::{CallContext, Principal};
use std::collections::BTreeSet;

/// Access rules for an audit trail, fixed when the trail is built.
///
/// There are two independent gates:
/// - the administrator (matched against the transaction sender) may write
///   and is the only principal that may read;
/// - allow-listed writers (matched against the immediate caller) may
///   write but not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    administrator: Principal,
    writers: BTreeSet<Principal>,
}

impl AccessPolicy {
    /// Build a policy from the administrator and the writer allow-list.
    #[must_use]
    pub fn new(administrator: Principal, writers: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            administrator,
            writers: writers.into_iter().collect(),
        }
    }

    /// The administrator principal.
    #[must_use]
    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    /// The writer allow-list, in sorted order.
    pub fn writers(&self) -> impl Iterator<Item = &Principal> {
        self.writers.iter()
    }

    /// Whether the transaction sender is the administrator.
    #[must_use]
    pub fn is_administrator(&self, ctx: &CallContext) -> bool {
        ctx.tx_sender == self.administrator
    }

    /// Whether the immediate caller is on the writer allow-list.
    #[must_use]
    pub fn is_authorized_writer(&self, ctx: &CallContext) -> bool {
        self.writers.contains(&ctx.contract_caller)
    }

    /// Whether the call may append events.
    #[must_use]
    pub fn can_write(&self, ctx: &CallContext) -> bool {
        self.is_authorized_writer(ctx) || self.is_administrator(ctx)
    }

    /// Whether the call may read events.
    #[must_use]
    pub fn can_read(&self, ctx: &CallContext) -> bool {
        self.is_administrator(ctx)
    }
}
