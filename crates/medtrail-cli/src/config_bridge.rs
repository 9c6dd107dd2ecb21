//! Bridge from `medtrail_config::Config` to domain types.
//!
//! The config crate only knows strings. Principals, the access policy, the
//! storage backend, and the logging setup are built here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use medtrail_audit::AccessPolicy;
use medtrail_config::{AccessSection, LoggingSection, StorageBackend, StorageSection};
use medtrail_core::Principal;
use medtrail_storage::{KvStore, MemoryKvStore, SurrealKvStore};
use medtrail_telemetry::{LogConfig, LogFormat};
use tracing::warn;

/// Build the access policy from the `[access]` section.
pub(crate) fn access_policy(access: &AccessSection) -> Result<AccessPolicy> {
    let administrator: Principal = access
        .administrator
        .parse()
        .context("invalid access.administrator")?;

    let writers = access
        .writers
        .iter()
        .map(|w| {
            w.parse::<Principal>()
                .with_context(|| format!("invalid writer '{w}' in access.writers"))
        })
        .collect::<Result<Vec<Principal>>>()?;

    for writer in writers.iter().filter(|w| !w.is_contract()) {
        warn!(
            %writer,
            "writer is not a contract principal; it only matches direct calls"
        );
    }

    Ok(AccessPolicy::new(administrator, writers))
}

/// Build the logging setup from the `[logging]` section.
///
/// `verbose` raises the level to `debug` regardless of the file.
pub(crate) fn log_config(logging: &LoggingSection, verbose: bool) -> Result<LogConfig> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let format: LogFormat = logging.format.parse()?;
    Ok(LogConfig::new(level)
        .with_format(format)
        .with_directives(logging.directives.iter().cloned()))
}

/// The opened storage backend.
pub(crate) enum OpenedStore {
    /// Process-lifetime memory.
    Memory(Arc<MemoryKvStore>),
    /// Persistent store that must be closed on exit.
    Persistent(Arc<SurrealKvStore>),
}

impl OpenedStore {
    /// Open the backend named in the `[storage]` section.
    pub(crate) fn open(storage: &StorageSection) -> Result<Self> {
        match storage.backend {
            StorageBackend::Memory => Ok(Self::Memory(Arc::new(MemoryKvStore::new()))),
            StorageBackend::Surrealkv => {
                let Some(path) = storage.path.as_deref() else {
                    bail!("storage.path is required for the surrealkv backend");
                };
                let path = PathBuf::from(path);
                std::fs::create_dir_all(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let store = SurrealKvStore::open(&path)
                    .with_context(|| format!("failed to open store at {}", path.display()))?;
                Ok(Self::Persistent(Arc::new(store)))
            },
        }
    }

    /// The store as the trait object the audit trail consumes.
    pub(crate) fn kv(&self) -> Arc<dyn KvStore> {
        match self {
            Self::Memory(store) => Arc::clone(store) as Arc<dyn KvStore>,
            Self::Persistent(store) => Arc::clone(store) as Arc<dyn KvStore>,
        }
    }

    /// Flush and close a persistent store.
    pub(crate) async fn close(self) -> Result<()> {
        if let Self::Persistent(store) = self {
            store.close().await.context("failed to close store")?;
        }
        Ok(())
    }
}
