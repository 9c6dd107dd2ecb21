//! Persistent backend on `SurrealKV`.
//!
//! Composite keys are `"{namespace}\0{key}"`. Because `\0` is the
//! separator, the half-open range `["{namespace}\0", "{namespace}\x01")`
//! holds exactly the keys of one namespace.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::kv::{KvEntry, KvStore, validate_key, validate_namespace};

fn composite_key(namespace: &str, key: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(namespace.len().saturating_add(key.len()).saturating_add(1));
    buf.extend_from_slice(namespace.as_bytes());
    buf.push(0);
    buf.extend_from_slice(key.as_bytes());
    buf
}

fn namespace_bound(namespace: &str, terminator: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(namespace.len().saturating_add(1));
    buf.extend_from_slice(namespace.as_bytes());
    buf.push(terminator);
    buf
}

fn map_kv_err(e: &surrealkv::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

/// Persistent key-value store backed by `SurrealKV`.
///
/// Every operation runs in its own transaction; [`set_batch`](KvStore::set_batch)
/// runs in exactly one.
pub struct SurrealKvStore {
    tree: surrealkv::Tree,
}

impl std::fmt::Debug for SurrealKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealKvStore").finish_non_exhaustive()
    }
}

impl SurrealKvStore {
    /// Open a persistent store at the given directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if the store cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let tree = surrealkv::TreeBuilder::new()
            .with_path(path.to_path_buf())
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        debug!(path = %path.display(), "opened surrealkv store");
        Ok(Self { tree })
    }

    /// Close the store, flushing pending writes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Internal`] if the flush fails.
    pub async fn close(&self) -> StorageResult<()> {
        self.tree
            .close()
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))
    }

    fn namespace_raw_keys(&self, namespace: &str) -> StorageResult<Vec<Vec<u8>>> {
        let start = namespace_bound(namespace, 0);
        let end = namespace_bound(namespace, 1);
        let tx = self
            .tree
            .begin_with_mode(surrealkv::Mode::ReadOnly)
            .map_err(|ref e| map_kv_err(e))?;
        let mut iter = tx.range(&start, &end).map_err(|ref e| map_kv_err(e))?;
        iter.seek_first().map_err(|ref e| map_kv_err(e))?;

        let mut keys = Vec::new();
        while iter.valid() {
            keys.push(iter.key().to_vec());
            iter.next().map_err(|ref e| map_kv_err(e))?;
        }
        Ok(keys)
    }
}

#[async_trait]
impl KvStore for SurrealKvStore {
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let tx = self
            .tree
            .begin_with_mode(surrealkv::Mode::ReadOnly)
            .map_err(|ref e| map_kv_err(e))?;
        tx.get(&composite_key(namespace, key))
            .map_err(|ref e| map_kv_err(e))
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.set_batch(vec![KvEntry::new(namespace, key, value)])
            .await
    }

    async fn set_batch(&self, entries: Vec<KvEntry>) -> StorageResult<()> {
        for entry in &entries {
            entry.validate()?;
        }
        if entries.is_empty() {
            return Ok(());
        }
        let mut tx = self.tree.begin().map_err(|ref e| map_kv_err(e))?;
        for entry in &entries {
            tx.set(&composite_key(&entry.namespace, &entry.key), &entry.value)
                .map_err(|ref e| map_kv_err(e))?;
        }
        tx.commit().await.map_err(|ref e| map_kv_err(e))
    }

    async fn delete(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        let ck = composite_key(namespace, key);
        let mut tx = self.tree.begin().map_err(|ref e| map_kv_err(e))?;
        let existed = tx.get(&ck).map_err(|ref e| map_kv_err(e))?.is_some();
        if existed {
            tx.delete(&ck).map_err(|ref e| map_kv_err(e))?;
            tx.commit().await.map_err(|ref e| map_kv_err(e))?;
        }
        Ok(existed)
    }

    async fn exists(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        Ok(self.get(namespace, key).await?.is_some())
    }

    async fn list_keys(&self, namespace: &str) -> StorageResult<Vec<String>> {
        validate_namespace(namespace)?;
        let prefix_len = namespace.len().saturating_add(1);
        Ok(self
            .namespace_raw_keys(namespace)?
            .iter()
            .filter_map(|raw| raw.get(prefix_len..))
            .filter(|rest| !rest.is_empty())
            .filter_map(|rest| std::str::from_utf8(rest).ok())
            .map(str::to_owned)
            .collect())
    }

    async fn clear_namespace(&self, namespace: &str) -> StorageResult<u64> {
        validate_namespace(namespace)?;
        let keys = self.namespace_raw_keys(namespace)?;
        if keys.is_empty() {
            return Ok(0);
        }
        let mut tx = self.tree.begin().map_err(|ref e| map_kv_err(e))?;
        for key in &keys {
            tx.delete(key).map_err(|ref e| map_kv_err(e))?;
        }
        tx.commit().await.map_err(|ref e| map_kv_err(e))?;
        Ok(u64::try_from(keys.len()).unwrap_or(u64::MAX))
    }
}
