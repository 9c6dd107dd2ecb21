//! Mock storage for exercising failure paths.

use async_trait::async_trait;
use medtrail_storage::{KvEntry, KvStore, MemoryKvStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A [`MemoryKvStore`] whose writes and reads can be switched to fail.
///
/// Failed writes commit nothing, matching a backend whose transaction
/// aborted. Reads always see what the inner store holds unless
/// [`fail_reads`](Self::fail_reads) is set.
#[derive(Debug, Default)]
pub struct FailingKvStore {
    inner: MemoryKvStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    commits: AtomicU64,
}

impl FailingKvStore {
    /// A store that currently succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful write commits so far.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Internal("injected write failure".into()));
        }
        Ok(())
    }

    fn check_read(&self) -> StorageResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Internal("injected read failure".into()));
        }
        Ok(())
    }

    fn committed(&self) {
        let _ = self
            .commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1));
    }
}

#[async_trait]
impl KvStore for FailingKvStore {
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.check_read()?;
        self.inner.get(namespace, key).await
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.check_write()?;
        self.inner.set(namespace, key, value).await?;
        self.committed();
        Ok(())
    }

    async fn set_batch(&self, entries: Vec<KvEntry>) -> StorageResult<()> {
        self.check_write()?;
        self.inner.set_batch(entries).await?;
        self.committed();
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        self.check_write()?;
        self.inner.delete(namespace, key).await
    }

    async fn exists(&self, namespace: &str, key: &str) -> StorageResult<bool> {
        self.check_read()?;
        self.inner.exists(namespace, key).await
    }

    async fn list_keys(&self, namespace: &str) -> StorageResult<Vec<String>> {
        self.check_read()?;
        self.inner.list_keys(namespace).await
    }

    async fn clear_namespace(&self, namespace: &str) -> StorageResult<u64> {
        self.check_write()?;
        self.inner.clear_namespace(namespace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_failure_commits_nothing() {
        let store = FailingKvStore::new();
        store.set("ns", "a", b"1".to_vec()).await.unwrap();
        assert_eq!(store.commits(), 1);

        store.fail_writes(true);
        let err = store
            .set_batch(vec![KvEntry::new("ns", "b", b"2".to_vec())])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
        assert_eq!(store.commits(), 1);
        assert_eq!(store.list_keys("ns").await.unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_read_failure() {
        let store = FailingKvStore::new();
        store.fail_reads(true);
        assert!(store.get("ns", "a").await.is_err());
        store.fail_reads(false);
        assert!(store.get("ns", "a").await.unwrap().is_none());
    }
}
