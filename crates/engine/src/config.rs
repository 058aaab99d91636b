//! Engine configuration via `docengine.toml`
//!
//! A host embeds the engine with [`EngineConfig::default`] or loads the
//! settings from a TOML file. All settings are read once when the engine is
//! built; the engine never re-reads the file.

use docengine_core::{Error, Limits, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "docengine.toml";

/// Engine configuration loaded from `docengine.toml`.
///
/// # Example
///
/// ```toml
/// # Omit fields whose value is null when parsing text documents
/// drop_null_fields = false
///
/// [limits]
/// max_nesting_depth = 128
/// max_encoded_bytes = 33554432
/// max_path_steps = 256
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Omit `null` document fields when parsing text.
    #[serde(default)]
    pub drop_null_fields: bool,
    /// Size limits; every limit is unbounded unless set.
    #[serde(default)]
    pub limits: Limits,
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docengine configuration
#
# Omit document fields whose value is null when parsing text (default: false).
# Null array elements are always kept.
drop_null_fields = false

# Size limits. Every limit is unbounded unless set.
[limits]
# max_nesting_depth = 128
# max_encoded_bytes = 33554432   # 32 MiB
# max_path_steps = 256
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML for this
    /// structure, or if a limit could never be satisfied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Serialize this config to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Reject limits that no document or path could satisfy.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.max_nesting_depth == Some(0) {
            return Err(Error::Config(
                "max_nesting_depth must be at least 1 (the top-level document)".to_string(),
            ));
        }
        // Smallest encoding is the empty document: tag plus count
        if matches!(limits.max_encoded_bytes, Some(max) if max < 5) {
            return Err(Error::Config(
                "max_encoded_bytes must be at least 5 (the empty document)".to_string(),
            ));
        }
        if limits.max_path_steps == Some(0) {
            return Err(Error::Config(
                "max_path_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
