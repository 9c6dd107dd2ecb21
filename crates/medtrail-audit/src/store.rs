//! Event persistence on top of a [`KvStore`].

use medtrail_storage::{KvStore, ScopedKvStore, StorageError};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AuditError, AuditResult};
use crate::event::{Event, EventId};

// -- Namespace constants --

const NS_EVENTS: &str = "medtrail:events";
const NS_META: &str = "medtrail:meta";
const KEY_NEXT_EVENT_ID: &str = "next_event_id";

/// Dense, append-only map from [`EventId`] to [`Event`].
///
/// The next free id is persisted next to the events and cached in memory.
/// Every append re-reads the persisted counter, so several handles over one
/// backend keep handing out dense ids, and writes the event and the bumped
/// counter in a single [`KvStore::set_batch`], so a failed write leaves
/// both untouched. An id whose key is already occupied is never reused.
pub struct EventStore {
    events: ScopedKvStore,
    meta: ScopedKvStore,
    next_id: EventId,
}

impl std::fmt::Debug for EventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl EventStore {
    /// Bind to `store` and load the persisted counter.
    ///
    /// An empty store starts at id 0.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Storage`] if the backend fails, or
    /// [`AuditError::Corrupted`] if the stored counter cannot be decoded.
    pub async fn open(store: Arc<dyn KvStore>) -> AuditResult<Self> {
        let events = ScopedKvStore::new(Arc::clone(&store), NS_EVENTS)?;
        let meta = ScopedKvStore::new(store, NS_META)?;

        let next_id = load_next_id(&meta).await?;

        debug!(next_id = %next_id, "opened event store");
        Ok(Self {
            events,
            meta,
            next_id,
        })
    }

    /// The id the next append will receive. Also the number of stored events.
    ///
    /// Reflects the counter as of the last open or append through this
    /// handle.
    #[must_use]
    pub fn next_id(&self) -> EventId {
        self.next_id
    }

    /// Store `event` under the next id and advance the counter.
    ///
    /// # Errors
    ///
    /// - [`AuditError::CounterOverflow`] if the counter is exhausted.
    /// - [`AuditError::IdConflict`] if an event is already stored under the
    ///   next id.
    /// - [`AuditError::Storage`] if the commit fails.
    ///
    /// In every case nothing is written and the counter does not move.
    pub async fn append(&mut self, event: &Event) -> AuditResult<EventId> {
        let id = load_next_id(&self.meta).await?.max(self.next_id);
        let next = id.next().ok_or(AuditError::CounterOverflow)?;

        let key = id.storage_key();
        if self.events.exists(&key).await? {
            warn!(event_id = %id, "refusing to overwrite stored audit event");
            return Err(AuditError::IdConflict { event_id: id.0 });
        }

        let batch = vec![
            self.events.json_entry(&key, event)?,
            self.meta.json_entry(KEY_NEXT_EVENT_ID, &next)?,
        ];
        self.events.store().set_batch(batch).await?;

        self.next_id = next;
        Ok(id)
    }

    /// Load the event stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Storage`] if the backend fails, or
    /// [`AuditError::Corrupted`] if the stored bytes do not decode.
    pub async fn get(&self, id: EventId) -> AuditResult<Option<Event>> {
        let key = id.storage_key();
        self.events
            .get_json::<Event>(&key)
            .await
            .map_err(|e| corrupted(&key, e))
    }

    /// Whether an event is stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Storage`] if the backend fails.
    pub async fn exists(&self, id: EventId) -> AuditResult<bool> {
        Ok(self.events.exists(&id.storage_key()).await?)
    }
}

async fn load_next_id(meta: &ScopedKvStore) -> AuditResult<EventId> {
    Ok(meta
        .get_json::<EventId>(KEY_NEXT_EVENT_ID)
        .await
        .map_err(|e| corrupted(KEY_NEXT_EVENT_ID, e))?
        .unwrap_or(EventId::FIRST))
}

fn corrupted(key: &str, e: StorageError) -> AuditError {
    match e {
        StorageError::Serialization(reason) => AuditError::Corrupted {
            key: key.to_owned(),
            reason,
        },
        other => AuditError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medtrail_core::{Principal, Timestamp};
    use medtrail_storage::MemoryKvStore;

    use crate::event::EventDraft;

    fn event(n: u64) -> Event {
        let actor: Principal = "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC".parse().unwrap();
        EventDraft::new("REGISTER_PATIENT", format!("PATIENT{n}"), actor)
            .into_event(Timestamp::from_secs(n))
    }

    #[tokio::test]
    async fn test_append_assigns_dense_ids() {
        let mut store = EventStore::open(Arc::new(MemoryKvStore::new()))
            .await
            .unwrap();
        assert_eq!(store.next_id(), EventId(0));

        assert_eq!(store.append(&event(0)).await.unwrap(), EventId(0));
        assert_eq!(store.append(&event(1)).await.unwrap(), EventId(1));
        assert_eq!(store.next_id(), EventId(2));

        assert_eq!(store.get(EventId(1)).await.unwrap(), Some(event(1)));
        assert!(store.exists(EventId(0)).await.unwrap());
        assert!(!store.exists(EventId(2)).await.unwrap());
        assert!(store.get(EventId(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_counter_survives_reopen() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        {
            let mut store = EventStore::open(Arc::clone(&kv)).await.unwrap();
            store.append(&event(0)).await.unwrap();
            store.append(&event(1)).await.unwrap();
        }
        let mut reopened = EventStore::open(Arc::clone(&kv)).await.unwrap();
        assert_eq!(reopened.next_id(), EventId(2));
        assert_eq!(reopened.append(&event(2)).await.unwrap(), EventId(2));
    }

    #[tokio::test]
    async fn test_counter_overflow_writes_nothing() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(NS_META, KEY_NEXT_EVENT_ID, u64::MAX.to_string().into_bytes())
            .await
            .unwrap();

        let mut store = EventStore::open(Arc::clone(&kv)).await.unwrap();
        let err = store.append(&event(0)).await.unwrap_err();
        assert!(matches!(err, AuditError::CounterOverflow));
        assert_eq!(store.next_id(), EventId(u64::MAX));
        assert!(kv.list_keys(NS_EVENTS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handles_over_one_backend_share_the_counter() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let mut a = EventStore::open(Arc::clone(&kv)).await.unwrap();
        let mut b = EventStore::open(Arc::clone(&kv)).await.unwrap();

        assert_eq!(a.append(&event(0)).await.unwrap(), EventId(0));
        assert_eq!(b.append(&event(1)).await.unwrap(), EventId(1));
        assert_eq!(a.append(&event(2)).await.unwrap(), EventId(2));

        assert_eq!(b.get(EventId(0)).await.unwrap(), Some(event(0)));
        assert_eq!(a.get(EventId(1)).await.unwrap(), Some(event(1)));
        assert_eq!(a.next_id(), EventId(3));
    }

    #[tokio::test]
    async fn test_occupied_id_is_never_overwritten() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let mut store = EventStore::open(Arc::clone(&kv)).await.unwrap();
        store.append(&event(0)).await.unwrap();

        // Roll the persisted counter back so the next id points at event 0.
        kv.set(NS_META, KEY_NEXT_EVENT_ID, b"0".to_vec())
            .await
            .unwrap();
        let mut rolled_back = EventStore::open(Arc::clone(&kv)).await.unwrap();

        let err = rolled_back.append(&event(9)).await.unwrap_err();
        assert!(matches!(err, AuditError::IdConflict { event_id: 0 }));
        assert_eq!(rolled_back.next_id(), EventId(0));
        assert_eq!(rolled_back.get(EventId(0)).await.unwrap(), Some(event(0)));
    }

    #[tokio::test]
    async fn test_corrupted_counter_is_reported() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(NS_META, KEY_NEXT_EVENT_ID, b"not a number".to_vec())
            .await
            .unwrap();
        let err = EventStore::open(kv).await.unwrap_err();
        assert!(matches!(err, AuditError::Corrupted { ref key, .. } if key == KEY_NEXT_EVENT_ID));
    }

    #[tokio::test]
    async fn test_corrupted_event_is_reported() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        kv.set(NS_EVENTS, "0", b"{}".to_vec()).await.unwrap();
        let store = EventStore::open(kv).await.unwrap();
        let err = store.get(EventId(0)).await.unwrap_err();
        assert!(matches!(err, AuditError::Corrupted { ref key, .. } if key == "0"));
    }
}
