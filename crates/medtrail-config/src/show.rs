//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path to the layer that set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded (in precedence order).
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON (for programmatic consumption).
    Json,
}

impl ResolvedConfig {
    /// Render the resolved config, optionally restricted to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the section does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(section),
            ShowFormat::Json => self.show_json(section),
        }
    }

    fn section_value(&self, section: &str) -> Result<toml::Value, fmt::Error> {
        let val = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        let table = val.as_table().ok_or(fmt::Error)?;
        table.get(section).cloned().ok_or(fmt::Error)
    }

    fn show_toml(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        let toml_str = if let Some(section_name) = section {
            toml::to_string_pretty(&self.section_value(section_name)?).map_err(|_| fmt::Error)?
        } else {
            toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?
        };

        let mut output = String::new();
        output.push_str("# Resolved medtrail configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [explicit] [env]\n");

        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        let mut current_section = section.unwrap_or("").to_owned();
        for line in toml_str.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                current_section = header.to_owned();
            }
            if let Some(annotation) = self.annotate_line(trimmed, &current_section) {
                writeln!(output, "{line}  # {annotation}")?;
            } else {
                writeln!(output, "{line}")?;
            }
        }

        Ok(output)
    }

    fn show_json(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        if let Some(section_name) = section {
            serde_json::to_string_pretty(&self.section_value(section_name)?)
                .map_err(|_| fmt::Error)
        } else {
            serde_json::to_string_pretty(&self.config).map_err(|_| fmt::Error)
        }
    }

    /// Source annotation for a `key = value` line, if the key was tracked.
    fn annotate_line(&self, trimmed: &str, section: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let key = trimmed.split('=').next()?.trim();
        let field_path = if section.is_empty() {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };
        self.field_sources
            .get(&field_path)
            .map(|layer| format!("[{layer}]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{ConfigLayer, FieldSources};

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("logging.level".to_owned(), ConfigLayer::Environment);
        ResolvedConfig {
            config: Config::default(),
            field_sources,
            loaded_files: vec!["/home/user/.medtrail/config.toml".to_owned()],
        }
    }

    #[test]
    fn test_show_toml_annotates_sources() {
        let output = resolved().show(ShowFormat::Toml, None).unwrap();
        assert!(output.contains("Resolved medtrail configuration"));
        assert!(output.contains("1. /home/user/.medtrail/config.toml"));
        assert!(output.contains("level = \"warn\"  # [environment variable]"));
    }

    #[test]
    fn test_show_json_section() {
        let output = resolved().show(ShowFormat::Json, Some("access")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["writers"].as_array().unwrap().len(), 3);
        assert!(value.get("level").is_none());
    }

    #[test]
    fn test_show_unknown_section() {
        assert!(resolved().show(ShowFormat::Toml, Some("nope")).is_err());
    }
}
