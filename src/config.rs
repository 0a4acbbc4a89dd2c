//! Application configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! schema_version = "2.0.5"
//!
//! [legacy_builds]
//! "1050" = "1.10.5"
//! "1065" = "1.11.0"
//! ```

use crate::migration::BuildTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Schema version stamped into exported packages unless configured
pub const DEFAULT_SCHEMA_VERSION: &str = "2.0.5";

fn default_schema_version() -> String {
    DEFAULT_SCHEMA_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Version written to `meta.version` on export
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Build number -> dotted version, for non-dotted 1.x tags
    #[serde(default)]
    pub legacy_builds: BuildTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            legacy_builds: BuildTable::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// The defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }
}
