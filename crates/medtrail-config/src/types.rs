//! Configuration types for the medtrail host.
//!
//! These mirror the domain types as plain strings; conversion to
//! principals and policies happens in the host that consumes them. Every
//! struct implements [`Default`], so a bare `[section]` header in TOML
//! still produces a working configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for the medtrail host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Administrator and writer allow-list.
    pub access: AccessSection,
    /// Where events are kept.
    pub storage: StorageSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// AccessSection
// ---------------------------------------------------------------------------

/// Who may read and who may write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSection {
    /// The only principal allowed to read events.
    pub administrator: String,
    /// Contract principals allowed to append events.
    pub writers: Vec<String>,
}

impl Default for AccessSection {
    fn default() -> Self {
        Self {
            administrator: "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".to_owned(),
            writers: vec![
                ".patient-identity".to_owned(),
                ".provider-verification".to_owned(),
                ".record-access".to_owned(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// StorageSection
// ---------------------------------------------------------------------------

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-lifetime in-memory store.
    Memory,
    /// Persistent `SurrealKV` store.
    #[default]
    Surrealkv,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Surrealkv => write!(f, "surrealkv"),
        }
    }
}

/// Event storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Which backend to use.
    pub backend: StorageBackend,
    /// Directory of the persistent store. Required for `surrealkv`; the
    /// loader fills in `~/.medtrail/data` when no layer sets it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["medtrail_audit=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
