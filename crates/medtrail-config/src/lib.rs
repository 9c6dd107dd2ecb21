#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the medtrail host.
//!
//! # Usage
//!
//! ```rust,no_run
//! use medtrail_config::Config;
//!
//! // defaults -> ~/.medtrail/config.toml -> explicit file -> env fallback
//! let resolved = Config::load(None).unwrap();
//! println!("administrator: {}", resolved.config.access.administrator);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed by the caller
//! 2. **User** (`~/.medtrail/config.toml`, or `$MEDTRAIL_HOME/config.toml`)
//! 3. **Environment variables** (`MEDTRAIL_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate has no dependencies on other internal medtrail crates.
//! Principals and policies are built from it at the host boundary.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with source tracking.
pub mod merge;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use merge::ConfigLayer;
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load configuration with an explicit medtrail home directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        medtrail_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(medtrail_home))
    }
}
