use crate::store::Catalog;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML file holding a [`Catalog`]
pub struct Storage {
    file_path: PathBuf,
}

/// Drop `null` values recursively; TOML has no null
fn prune_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(prune_nulls);
        }
        _ => {}
    }
}

/// Drop `null` values from every entity in place
///
/// Leaves the catalog equal to what a reload of the saved file returns.
pub(crate) fn prune_catalog(catalog: &mut Catalog) -> Result<()> {
    let mut value = serde_json::to_value(&*catalog)?;
    prune_nulls(&mut value);
    *catalog = serde_json::from_value(value)?;
    Ok(())
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Load the catalog, or an empty one when the file does not exist yet
    pub fn load(&self) -> Result<Catalog> {
        if !self.file_path.exists() {
            return Ok(Catalog::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read catalog {}", self.file_path.display()))?;
        let catalog: Catalog = toml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), entities = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut value = serde_json::to_value(catalog)?;
        prune_nulls(&mut value);
        let content = toml::to_string_pretty(&value)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write catalog {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), entities = catalog.len(), "Saved catalog");
        Ok(())
    }
}
