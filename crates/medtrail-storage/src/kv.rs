//! Key-value store trait and key validation.
//!
//! Every key lives in a namespace. The audit trail keeps its events in
//! `medtrail:events` and its counter in `medtrail:meta`; nothing else
//! writes there.

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};

/// A key-value write addressed by namespace and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    /// The namespace this entry belongs to.
    pub namespace: String,
    /// The key within the namespace.
    pub key: String,
    /// The raw value bytes.
    pub value: Vec<u8>,
}

impl KvEntry {
    /// Build an entry.
    #[must_use]
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value,
        }
    }

    /// Check namespace and key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if either part is empty or
    /// contains a NUL byte.
    pub fn validate(&self) -> StorageResult<()> {
        validate_namespace(&self.namespace)?;
        validate_key(&self.key)
    }
}

/// Namespaced byte-level storage.
///
/// Each call is atomic on its own. [`set_batch`](Self::set_batch) extends
/// that to a group of writes.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get a value by namespace and key.
    ///
    /// Returns `None` if the key does not exist.
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Set a value for a namespace and key, overwriting any existing value.
    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> StorageResult<()>;

    /// Write every entry in one atomic commit.
    ///
    /// Either all entries become visible or none do. Entries are validated
    /// before anything is written.
    async fn set_batch(&self, entries: Vec<KvEntry>) -> StorageResult<()>;

    /// Delete a key. Returns `true` if it existed.
    async fn delete(&self, namespace: &str, key: &str) -> StorageResult<bool>;

    /// Check if a key exists in a namespace.
    async fn exists(&self, namespace: &str, key: &str) -> StorageResult<bool>;

    /// List all keys in a namespace, in byte order.
    async fn list_keys(&self, namespace: &str) -> StorageResult<Vec<String>>;

    /// Delete all keys in a namespace. Returns how many were removed.
    async fn clear_namespace(&self, namespace: &str) -> StorageResult<u64>;
}

/// Namespaces must be non-empty and free of NUL, which separates
/// namespace from key in composite keys.
pub(crate) fn validate_namespace(namespace: &str) -> StorageResult<()> {
    if namespace.is_empty() {
        return Err(StorageError::InvalidKey(
            "namespace must not be empty".into(),
        ));
    }
    if namespace.contains('\0') {
        return Err(StorageError::InvalidKey(
            "namespace must not contain null bytes".into(),
        ));
    }
    Ok(())
}

/// Keys follow the same rules as namespaces.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".into()));
    }
    if key.contains('\0') {
        return Err(StorageError::InvalidKey(
            "key must not contain null bytes".into(),
        ));
    }
    Ok(())
}
