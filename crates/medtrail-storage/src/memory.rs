//! In-memory backend.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StorageError, StorageResult};
use crate::kv::{KvEntry, KvStore, validate_key, validate_namespace};

type Table = BTreeMap<(String, String), Vec<u8>>;

/// In-memory key-value store for tests and ephemeral hosts.
///
/// Entries are ordered by `(namespace, key)`, so namespace listings come
/// back in byte order just like the persistent backend.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    data: RwLock<Table>,
}

impl MemoryKvStore {
    /// Create a new empty in-memory KV store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Table>> {
        self.data
            .read()
            .map_err(|e| StorageError::Internal(e.to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Table>> {
        self.data
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))
    }

    fn namespace_keys(data: &Table, namespace: &str) -> Vec<(String, String)> {
        data.range((namespace.to_owned(), String::new())..)
            .take_while(|((ns, _), _)| ns == namespace)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(self
            .read()?
            .get(&(namespace.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> StorageResult<()> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        self.write()?
            .insert((namespace.to_owned(), key.to_owned()), value);
        Ok(())
    }

    async fn set_batch(&self, entries: Vec<KvEntry>) -> StorageResult<()> {
        for entry in &entries {
            entry.validate()?;
        }
        // One write guard for the whole batch: readers see all or nothing.
        let mut data = self.write()?;
        for entry in entries {
            data.insert((entry.namespace, entry.key), entry.value);
        }
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(self
            .write()?
            .remove(&(namespace.to_owned(), key.to_owned()))
            .is_some())
    }

    async fn exists(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(self
            .read()?
            .contains_key(&(namespace.to_owned(), key.to_owned())))
    }

    async fn list_keys(&self, namespace: &str) -> StorageResult<Vec<String>> {
        validate_namespace(namespace)?;
        let data = self.read()?;
        Ok(Self::namespace_keys(&data, namespace)
            .into_iter()
            .map(|(_, key)| key)
            .collect())
    }

    async fn clear_namespace(&self, namespace: &str) -> StorageResult<u64> {
        validate_namespace(namespace)?;
        let mut data = self.write()?;
        let keys = Self::namespace_keys(&data, namespace);
        let mut removed: u64 = 0;
        for key in keys {
            if data.remove(&key).is_some() {
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }
}
