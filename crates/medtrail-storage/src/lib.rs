//! Medtrail Storage - the host's atomic storage primitives.
//!
//! The audit trail never touches a database directly. It talks to a
//! [`KvStore`]: namespaced byte-level `get` / `set` / `exists`, plus
//! [`set_batch`](KvStore::set_batch), which commits several keys as one
//! atomic unit so that an appended event and its counter bump land
//! together or not at all.
//!
//! # Backends
//!
//! | Backend | Feature | Use |
//! |---------|---------|-----|
//! | [`MemoryKvStore`] | always | tests, ephemeral hosts |
//! | `SurrealKvStore` | `kv` | persistent, ACID, embedded LSM tree |
//!
//! [`ScopedKvStore`] pre-binds a namespace and adds typed JSON helpers.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod kv;

mod memory;
mod scoped;
#[cfg(feature = "kv")]
mod surreal;

pub use error::{StorageError, StorageResult};
pub use kv::{KvEntry, KvStore};
pub use memory::MemoryKvStore;
pub use scoped::ScopedKvStore;

#[cfg(feature = "kv")]
pub use surreal::SurrealKvStore;
