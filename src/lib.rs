//! Pods package migration library
//!
//! This library imports and exports Pods packages: JSON documents carrying
//! pod definitions (typed record schemas), templates, pages and helpers.
//! Packages exported by 1.x sites are migrated to the 2.0 schema on import.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Package Layer**: `package` - Envelope decoding, import driver and exporter
//! - **Domain Layer**: `model` and `migration` - Typed entities, merge rules and
//!   the 1.x -> 2.0 rewriting pipeline
//! - **Persistence Layer**: `store` and `storage` - Entity store interface,
//!   in-memory catalog and its TOML file
//!
//! # Example
//!
//! ```no_run
//! use pods_migrate::{Config, PackageManager};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut manager = PackageManager::open("catalog.toml", Config::default())?;
//!     let package = std::fs::read_to_string("books.json")?;
//!     if let Some(summary) = manager.import(package, false)? {
//!         println!("{}", pods_migrate::formatting::format_summary(&summary));
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatting;
pub mod migration;
pub mod model;
pub mod package;
mod storage;
pub mod store;
pub mod validation;

use std::path::Path;

// Re-export commonly used types
pub use config::Config;
pub use error::ImportError;
pub use model::{EntityKind, Field, FieldType, Helper, HelperPhase, Page, Pod, Template};
pub use package::{
    Exporter, ImportSummary, Importer, PackageSource, Selection, Selector, SkippedEntity,
    parse_package,
};
pub use storage::Storage;
pub use store::{Catalog, Collection, Store};

/// Catalog file plus configuration, driving imports and exports
///
/// The catalog is loaded once on open and written back after every import
/// that reached the entity stage, so entities saved before a failure stay
/// committed. Null values are pruned from the in-memory catalog as well as
/// from the file.
pub struct PackageManager {
    catalog: Catalog,
    storage: Storage,
    config: Config,
}

impl PackageManager {
    /// Open a catalog file
    ///
    /// # Arguments
    /// * `catalog_path` - Path to the catalog file (TOML format); created on
    ///   the first import if missing
    /// * `config` - Schema version and legacy build table
    pub fn open(catalog_path: impl AsRef<Path>, config: Config) -> anyhow::Result<Self> {
        let storage = Storage::new(catalog_path);
        let catalog = storage.load()?;
        Ok(Self {
            catalog,
            storage,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import a package and persist the catalog
    ///
    /// # Arguments
    /// * `source` - Package JSON text or decoded value
    /// * `replace` - Replace entities with colliding names instead of merging
    ///
    /// # Returns
    /// The import summary, or `None` when nothing was imported
    pub fn import(
        &mut self,
        source: impl Into<PackageSource>,
        replace: bool,
    ) -> error::Result<Option<ImportSummary>> {
        let outcome =
            Importer::new(&mut self.catalog, &self.config.legacy_builds).import(source, replace);

        let reached_entities = !matches!(
            outcome,
            Err(ImportError::MalformedPackage(_)
                | ImportError::MissingVersion
                | ImportError::InvalidVersion(_))
        );
        if reached_entities {
            storage::prune_catalog(&mut self.catalog)?;
            self.storage.save(&self.catalog)?;
        }
        outcome
    }

    /// Export the selected entities as package JSON
    ///
    /// # Returns
    /// `None` when the selection is empty
    pub fn export(&self, selection: &Selection) -> anyhow::Result<Option<String>> {
        Exporter::new(self.config.schema_version.as_str()).export(&self.catalog, selection)
    }
}
