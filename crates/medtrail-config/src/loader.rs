//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` as the base
//! 2. Merge `~/.medtrail/config.toml` (user), if present
//! 3. Merge the explicit file, if one was given (it must exist)
//! 4. Apply env var fallbacks for fields no file set
//! 5. Deserialize the merged tree into [`Config`]
//! 6. Fill in the default store path under the medtrail home
//! 7. Validate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{MEDTRAIL_HOME_VAR, apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_all_leaves};
use crate::show::ResolvedConfig;
use crate::types::{Config, StorageBackend};
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MiB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Name of the per-user directory under the home directory.
const MEDTRAIL_DIR: &str = ".medtrail";

/// Load the configuration with layered precedence.
///
/// `explicit` is a file named by the caller (e.g. `--config`).
/// `medtrail_home_override` replaces `~/.medtrail` for user config and the
/// default store path.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable or malformed,
/// or if the final merged configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    medtrail_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let env_vars = collect_env_vars();
    let medtrail_home = match medtrail_home_override {
        Some(h) => h.to_path_buf(),
        None => medtrail_home(&env_vars)?,
    };
    load_with(explicit, &medtrail_home, &env_vars)
}

/// [`load`] with the home directory and environment supplied by the caller.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with<S: ::std::hash::BuildHasher>(
    explicit: Option<&Path>,
    medtrail_home: &Path,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_all_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User config.
    let user_path = medtrail_home.join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::User,
            &mut field_sources,
        );
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit config.
    if let Some(path) = explicit {
        let overlay = read_file(path)?;
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::Explicit,
            &mut field_sources,
        );
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded explicit config");
    }

    // 4. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let mut config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Default store path.
    if config.storage.backend == StorageBackend::Surrealkv && config.storage.path.is_none() {
        let path = medtrail_home.join("data");
        config.storage.path = Some(path.display().to_string());
        field_sources.insert("storage.path".to_owned(), ConfigLayer::Defaults);
    }

    // 7. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Read and parse a file that must exist.
fn read_file(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_content(path, &content)
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Uses a single read to avoid a race between an existence check and the
/// read itself.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };
    parse_content(path, &content).map(Some)
}

fn parse_content(path: &Path, content: &str) -> ConfigResult<toml::Value> {
    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }

    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// The medtrail home: `$MEDTRAIL_HOME` if set, else `~/.medtrail`.
fn medtrail_home<S: ::std::hash::BuildHasher>(
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<PathBuf> {
    if let Some(home) = env_vars.get(MEDTRAIL_HOME_VAR) {
        if home.trim().is_empty() {
            return Err(ConfigError::EnvError {
                var_name: MEDTRAIL_HOME_VAR.to_owned(),
                message: "must not be empty".to_owned(),
            });
        }
        return Ok(PathBuf::from(home));
    }
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(MEDTRAIL_DIR))
        .ok_or(ConfigError::NoHomeDir)
}
