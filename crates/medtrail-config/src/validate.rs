//! Post-merge configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, StorageBackend};

/// Longest principal the host accepts.
const MAX_PRINCIPAL_LEN: usize = 256;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_access(config)?;
    validate_storage(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

/// Syntactic principal check. The host re-parses every principal when it
/// builds the access policy.
fn check_principal(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(invalid(field, "principal must not be empty"));
    }
    if value.len() > MAX_PRINCIPAL_LEN {
        return Err(invalid(
            field,
            format!("principal exceeds {MAX_PRINCIPAL_LEN} bytes"),
        ));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid(
            field,
            format!("principal '{value}' contains whitespace or control characters"),
        ));
    }
    if value == "." {
        return Err(invalid(field, "contract principal has no name"));
    }
    Ok(())
}

fn validate_access(config: &Config) -> ConfigResult<()> {
    let access = &config.access;
    check_principal("access.administrator", &access.administrator)?;

    if access.writers.is_empty() {
        return Err(invalid(
            "access.writers",
            "at least one writer must be configured",
        ));
    }

    let mut seen = HashSet::new();
    for writer in &access.writers {
        check_principal("access.writers", writer)?;
        if !seen.insert(writer.as_str()) {
            return Err(invalid(
                "access.writers",
                format!("duplicate writer '{writer}'"),
            ));
        }
    }
    Ok(())
}

fn validate_storage(config: &Config) -> ConfigResult<()> {
    let storage = &config.storage;
    if storage.backend == StorageBackend::Surrealkv
        && storage.path.as_deref().is_none_or(str::is_empty)
    {
        return Err(invalid(
            "storage.path",
            "the surrealkv backend requires a storage path",
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    Ok(())
}
