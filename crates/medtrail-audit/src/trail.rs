//! The access-controlled audit trail.

use medtrail_core::{CallContext, Principal};
use medtrail_storage::{KvStore, MemoryKvStore};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AuditError, AuditResult};
use crate::event::{Event, EventDraft, EventId};
use crate::policy::AccessPolicy;
use crate::store::EventStore;

/// Append-only audit log with write and read gates.
///
/// Every operation checks, in order: authorization, input validity, and
/// (for reads) existence. A failed check returns before anything is
/// written, so rejected calls never consume an id.
///
/// Mutating operations take `&mut self`: the host runs one call at a time
/// and the borrow checker enforces the same for in-process callers.
#[derive(Debug)]
pub struct AuditTrail {
    policy: AccessPolicy,
    store: EventStore,
}

impl AuditTrail {
    /// Open a trail over `store`, resuming from any events already in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted counter cannot be loaded.
    pub async fn open(policy: AccessPolicy, store: Arc<dyn KvStore>) -> AuditResult<Self> {
        let store = EventStore::open(store).await?;
        Ok(Self { policy, store })
    }

    /// Open an empty trail backed by memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory store cannot be initialized.
    pub async fn in_memory(policy: AccessPolicy) -> AuditResult<Self> {
        Self::open(policy, Arc::new(MemoryKvStore::new())).await
    }

    /// The access policy this trail was built with.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Number of events recorded so far, as last seen by this trail.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.store.next_id().0
    }

    /// Record an event without detail.
    ///
    /// # Errors
    ///
    /// - [`AuditError::Unauthorized`] if the caller is neither an
    ///   allow-listed writer nor the administrator.
    /// - [`AuditError::InvalidInput`] if `event_type` is empty.
    /// - A host error if the commit fails or the next id is already taken.
    pub async fn record(
        &mut self,
        ctx: &CallContext,
        event_type: &str,
        resource_id: &str,
        actor: Principal,
    ) -> AuditResult<EventId> {
        self.append(ctx, EventDraft::new(event_type, resource_id, actor))
            .await
    }

    /// Record an event with a detail annotation. The detail may be empty.
    ///
    /// # Errors
    ///
    /// Same as [`record`](Self::record).
    pub async fn record_with_detail(
        &mut self,
        ctx: &CallContext,
        event_type: &str,
        resource_id: &str,
        actor: Principal,
        detail: &str,
    ) -> AuditResult<EventId> {
        self.append(
            ctx,
            EventDraft::new(event_type, resource_id, actor).with_detail(detail),
        )
        .await
    }

    /// Stamp `draft` with the block time and append it.
    ///
    /// # Errors
    ///
    /// Same as [`record`](Self::record).
    pub async fn append(&mut self, ctx: &CallContext, draft: EventDraft) -> AuditResult<EventId> {
        if !self.policy.can_write(ctx) {
            warn!(
                sender = %ctx.tx_sender,
                caller = %ctx.contract_caller,
                "rejected audit write: unauthorized"
            );
            return Err(AuditError::Unauthorized);
        }

        if draft.event_type().is_empty() {
            warn!(caller = %ctx.contract_caller, "rejected audit write: empty event type");
            return Err(AuditError::InvalidInput {
                reason: "event type must not be empty".to_string(),
            });
        }

        let has_detail = draft.has_detail();
        let event = draft.into_event(ctx.block_time);
        let id = self.store.append(&event).await?;
        debug!(
            event_id = %id,
            event_type = %event.event_type,
            caller = %ctx.contract_caller,
            relayed = ctx.is_relayed(),
            has_detail,
            "recorded audit event"
        );
        Ok(id)
    }

    /// Read back an event. Administrator only.
    ///
    /// # Errors
    ///
    /// - [`AuditError::Unauthorized`] if the sender is not the administrator.
    /// - [`AuditError::NotFound`] if no event has this id.
    /// - A host error if the read fails.
    pub async fn fetch(&self, ctx: &CallContext, id: EventId) -> AuditResult<Event> {
        if !self.policy.can_read(ctx) {
            warn!(sender = %ctx.tx_sender, event_id = %id, "rejected audit read: unauthorized");
            return Err(AuditError::Unauthorized);
        }

        self.store
            .get(id)
            .await?
            .ok_or(AuditError::NotFound { event_id: id.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrail_core::Timestamp;
    use medtrail_test::{
        administrator, at, direct, patient, patient_identity, provider, record_access,
        test_writers, unauthorized_contract,
    };

    async fn trail() -> AuditTrail {
        AuditTrail::in_memory(AccessPolicy::new(administrator(), test_writers()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_then_fetch() {
        let mut trail = trail().await;
        let ctx = at(provider(), patient_identity());
        let id = trail
            .record(&ctx, "REGISTER_PATIENT", "PATIENT123", patient())
            .await
            .unwrap();
        assert_eq!(id, EventId(0));
        assert_eq!(trail.event_count(), 1);

        let event = trail.fetch(&direct(administrator()), id).await.unwrap();
        assert_eq!(event.event_type, "REGISTER_PATIENT");
        assert_eq!(event.resource_id, "PATIENT123");
        assert_eq!(event.actor, patient());
        assert_eq!(event.timestamp, ctx.block_time);
        assert!(event.detail.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_before_invalid_input() {
        let mut trail = trail().await;
        let ctx = at(provider(), unauthorized_contract());
        let err = trail.record(&ctx, "", "R", patient()).await.unwrap_err();
        assert!(matches!(err, AuditError::Unauthorized));
        assert_eq!(trail.event_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_event_type_rejected() {
        let mut trail = trail().await;
        let ctx = at(provider(), record_access());
        let err = trail
            .record_with_detail(&ctx, "", "R", patient(), "detail")
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidInput { .. }));
        assert_eq!(trail.event_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_checks_authorization_before_existence() {
        let mut trail = trail().await;
        let writer = at(provider(), record_access());
        trail.record(&writer, "X", "R", patient()).await.unwrap();

        // A writer cannot read, whether or not the id exists.
        for id in [EventId(0), EventId(99)] {
            let err = trail.fetch(&writer, id).await.unwrap_err();
            assert!(matches!(err, AuditError::Unauthorized));
        }

        let err = trail
            .fetch(&direct(administrator()), EventId(99))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::NotFound { event_id: 99 }));
    }

    #[tokio::test]
    async fn test_block_time_is_stamped() {
        let mut trail = trail().await;
        let ctx = CallContext::direct(administrator(), Timestamp::from_secs(42));
        let id = trail
            .record_with_detail(&ctx, "AUDIT", "R", provider(), "")
            .await
            .unwrap();
        let event = trail.fetch(&ctx, id).await.unwrap();
        assert_eq!(event.timestamp, Timestamp::from_secs(42));
        assert_eq!(event.detail.as_deref(), Some(""));
    }
}
