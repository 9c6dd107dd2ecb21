//! Namespace-bound view of a store.

use std::sync::Arc;

use crate::error::{StorageError, StorageResult};
use crate::kv::{KvEntry, KvStore, validate_key, validate_namespace};

/// A [`KvStore`] with its namespace pre-bound, plus typed JSON access.
///
/// # Example
///
/// ```rust,ignore
/// use medtrail_storage::{MemoryKvStore, ScopedKvStore};
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryKvStore::new());
/// let events = ScopedKvStore::new(store, "medtrail:events")?;
///
/// let entry = events.json_entry("0", &"REGISTER_PATIENT")?;
/// events.store().set_batch(vec![entry]).await?;
/// let stored: Option<String> = events.get_json("0").await?;
/// ```
#[derive(Clone)]
pub struct ScopedKvStore {
    inner: Arc<dyn KvStore>,
    namespace: String,
}

impl std::fmt::Debug for ScopedKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedKvStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl ScopedKvStore {
    /// Bind `namespace` on `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the namespace is empty
    /// or contains null bytes.
    pub fn new(store: Arc<dyn KvStore>, namespace: impl Into<String>) -> StorageResult<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self {
            inner: store,
            namespace,
        })
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.inner
    }

    /// Get a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend fails.
    pub async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_key(key)?;
        self.inner.get(&self.namespace, key).await
    }

    /// Check whether a key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend fails.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        self.inner.exists(&self.namespace, key).await
    }

    /// Deserialize a JSON value. `None` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the stored bytes are not
    /// valid JSON for `T`.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> StorageResult<Option<T>> {
        self.get(key)
            .await?
            .map(|b| {
                serde_json::from_slice(&b).map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .transpose()
    }

    /// Build a JSON write for this namespace without committing it.
    ///
    /// Used to assemble entries for [`KvStore::set_batch`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if serialization fails, or
    /// [`StorageError::InvalidKey`] for an invalid key.
    pub fn json_entry<T: serde::Serialize>(&self, key: &str, value: &T) -> StorageResult<KvEntry> {
        validate_key(key)?;
        let bytes =
            serde_json::to_vec(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(KvEntry::new(self.namespace.clone(), key, bytes))
    }
}
