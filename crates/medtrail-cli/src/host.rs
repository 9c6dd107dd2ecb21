//! The local host environment: storage, clock, and the trail.

use anyhow::Result;
use medtrail_audit::AuditTrail;
use medtrail_config::Config;
use medtrail_core::{CallContext, Clock, Principal, SystemClock, Timestamp};
use tracing::debug;

use crate::config_bridge::{OpenedStore, access_policy};

/// Everything a command needs to invoke the audit trail.
pub(crate) struct Host {
    trail: AuditTrail,
    store: OpenedStore,
    clock: Box<dyn Clock>,
}

impl Host {
    /// Open the configured store and resume the trail in it.
    pub(crate) async fn open(config: &Config) -> Result<Self> {
        Self::open_with_clock(config, Box::new(SystemClock)).await
    }

    /// Like [`open`](Self::open) with an explicit block-time source.
    pub(crate) async fn open_with_clock(config: &Config, clock: Box<dyn Clock>) -> Result<Self> {
        let policy = access_policy(&config.access)?;
        let store = OpenedStore::open(&config.storage)?;
        let trail = AuditTrail::open(policy, store.kv()).await?;
        debug!(
            backend = %config.storage.backend,
            administrator = %trail.policy().administrator(),
            writers = trail.policy().writers().count(),
            events = trail.event_count(),
            "host ready"
        );
        Ok(Self {
            trail,
            store,
            clock,
        })
    }

    /// Build the call context for one invocation.
    ///
    /// Without `contract_caller` the call is direct. Without `time` the
    /// host clock supplies the block time.
    pub(crate) fn context(
        &self,
        sender: Principal,
        contract_caller: Option<Principal>,
        time: Option<u64>,
    ) -> CallContext {
        match (contract_caller, time) {
            (None, None) => CallContext::direct_now(sender, self.clock.as_ref()),
            (None, Some(secs)) => CallContext::direct(sender, Timestamp::from_secs(secs)),
            (Some(caller), time) => {
                let block_time = time.map_or_else(|| self.clock.now(), Timestamp::from_secs);
                CallContext::via_contract(sender, caller, block_time)
            },
        }
    }

    pub(crate) fn trail(&self) -> &AuditTrail {
        &self.trail
    }

    pub(crate) fn trail_mut(&mut self) -> &mut AuditTrail {
        &mut self.trail
    }

    /// Release the store.
    pub(crate) async fn close(self) -> Result<()> {
        drop(self.trail);
        self.store.close().await
    }
}
