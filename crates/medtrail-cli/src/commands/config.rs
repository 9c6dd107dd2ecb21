//! CLI handlers for the `medtrail config` subcommand.

use anyhow::Result;
use medtrail_config::{ResolvedConfig, ShowFormat};

use crate::output::OutputFormat;
use crate::theme::Theme;

/// Environment variables consulted for unset fields.
const ENV_FALLBACKS: &[(&str, &str)] = &[
    ("MEDTRAIL_ADMINISTRATOR", "access.administrator"),
    ("MEDTRAIL_WRITERS", "access.writers"),
    ("MEDTRAIL_STORAGE_BACKEND", "storage.backend"),
    ("MEDTRAIL_STORAGE_PATH", "storage.path"),
    ("MEDTRAIL_LOG_LEVEL", "logging.level"),
    ("MEDTRAIL_LOG_FORMAT", "logging.format"),
];

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(
    resolved: &ResolvedConfig,
    format: OutputFormat,
    section: Option<&str>,
) -> Result<()> {
    let show_format = match format {
        OutputFormat::Json => ShowFormat::Json,
        OutputFormat::Pretty => ShowFormat::Toml,
    };

    let output = resolved
        .show(show_format, section)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;

    println!("{output}");
    Ok(())
}

/// Report that the configuration loaded and validated.
pub(crate) fn validate_config(resolved: &ResolvedConfig) {
    println!("{}", Theme::success("Configuration is valid."));
    if !resolved.loaded_files.is_empty() {
        println!("\nLoaded files:");
        for path in &resolved.loaded_files {
            println!("  - {path}");
        }
    }
}

/// Show the files and environment variables consulted while loading.
pub(crate) fn show_paths(resolved: &ResolvedConfig) {
    println!("{}", Theme::header("Loaded config files (in precedence order)"));
    if resolved.loaded_files.is_empty() {
        println!("  {}", Theme::dimmed("none, using built-in defaults"));
    }
    for (i, path) in resolved.loaded_files.iter().enumerate() {
        println!("  {}. {path}", i.saturating_add(1));
    }

    println!("\n{}", Theme::header("Environment variable fallbacks"));
    for (var, field) in ENV_FALLBACKS {
        println!("  {var:<26} -> {field}");
    }
}
