//! Environment variable fallback.
//!
//! Environment variables are a fallback, not an override: they only fill
//! fields that no config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Environment variable naming an alternate medtrail home directory.
pub const MEDTRAIL_HOME_VAR: &str = "MEDTRAIL_HOME";

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `MEDTRAIL_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "MEDTRAIL_ADMINISTRATOR",
        field_path: "access.administrator",
    },
    EnvMapping {
        var_name: "MEDTRAIL_WRITERS",
        field_path: "access.writers",
    },
    EnvMapping {
        var_name: "MEDTRAIL_STORAGE_BACKEND",
        field_path: "storage.backend",
    },
    EnvMapping {
        var_name: "MEDTRAIL_STORAGE_PATH",
        field_path: "storage.path",
    },
    EnvMapping {
        var_name: "MEDTRAIL_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "MEDTRAIL_LOG_FORMAT",
        field_path: "logging.format",
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        // Only apply if no config file set this field.
        if sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field(merged, mapping.field_path, coerce_to_toml_value(mapping.field_path, val));
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a dotted `path` in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, toml_val: toml::Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), toml_val);
    }
}

/// Coerce a string env var value to the TOML type of the field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    // Comma-separated list fields.
    if path == "access.writers" {
        return toml::Value::Array(
            val.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_owned()))
                .collect(),
        );
    }

    toml::Value::String(val.to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_env_fills_defaulted_fields() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);

        let env = make_env(&[
            ("MEDTRAIL_LOG_LEVEL", "debug"),
            ("MEDTRAIL_WRITERS", ".a, .b,,"),
        ]);
        let applied = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(applied, 2);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        let writers: Vec<&str> = merged["access"]["writers"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(toml::Value::as_str)
            .collect();
        assert_eq!(writers, vec![".a", ".b"]);
        assert_eq!(
            sources.get("access.writers"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_never_overrides_files() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let env = make_env(&[("MEDTRAIL_LOG_LEVEL", "trace")]);
        assert_eq!(apply_env_fallbacks(&mut merged, &mut sources, &env), 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("info"));
    }
}
