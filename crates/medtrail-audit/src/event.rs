//! Audit event types.

use medtrail_core::{Principal, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an event in the trail.
///
/// Ids are dense and zero-based: the n-th successful write gets id `n - 1`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    /// The first id handed out.
    pub const FIRST: Self = Self(0);

    /// The id after this one, or `None` at `u64::MAX`.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Storage key for this id.
    #[must_use]
    pub fn storage_key(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A recorded audit event. Never modified once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Caller-supplied category, e.g. `REGISTER_PATIENT`.
    pub event_type: String,
    /// Identifier of the resource the event concerns.
    pub resource_id: String,
    /// Principal the event is about.
    pub actor: Principal,
    /// Block time at which the event was written.
    pub timestamp: Timestamp,
    /// Optional annotation.
    pub detail: Option<String>,
}

/// An event as submitted by a writer, before it is stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    event_type: String,
    resource_id: String,
    actor: Principal,
    detail: Option<String>,
}

impl EventDraft {
    /// Draft an event without detail.
    #[must_use]
    pub fn new(
        event_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: Principal,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            resource_id: resource_id.into(),
            actor,
            detail: None,
        }
    }

    /// Attach a detail annotation. An empty annotation is still present.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The event category.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether a detail annotation is attached.
    #[must_use]
    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// Stamp the draft with the block time.
    #[must_use]
    pub fn into_event(self, timestamp: Timestamp) -> Event {
        Event {
            event_type: self.event_type,
            resource_id: self.resource_id,
            actor: self.actor,
            timestamp,
            detail: self.detail,
        }
    }
}
