use super::{PackageSource, parse_package};
use crate::error::{ImportError, Result};
use crate::migration::{self, BuildResolver};
use crate::model::{Entity, EntityKind};
use crate::store::Store;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A record that was skipped because it could not be identified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub kind: EntityKind,
    pub reason: String,
}

/// Result of an import: collection -> entity name -> display label
///
/// Entities are listed in package order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: BTreeMap<EntityKind, IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntity>,
}

impl ImportSummary {
    fn record<E: Entity>(&mut self, entity: &E) {
        self.imported
            .entry(E::KIND)
            .or_default()
            .insert(entity.name().to_string(), entity.label().to_string());
    }

    /// Imported entities of one collection
    pub fn get(&self, kind: EntityKind) -> Option<&IndexMap<String, String>> {
        self.imported.get(&kind)
    }

    /// Display label recorded for an imported entity
    pub fn label(&self, kind: EntityKind, name: &str) -> Option<&str> {
        self.get(kind)?.get(name).map(String::as_str)
    }

    /// Number of imported entities across all collections
    pub fn total(&self) -> usize {
        self.imported.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Package import driver
///
/// Each record is an independent unit of work: a record that cannot be
/// identified is skipped, while a store failure stops the import and leaves
/// earlier records saved.
pub struct Importer<'a, S: Store + ?Sized> {
    store: &'a mut S,
    resolver: &'a dyn BuildResolver,
}

impl<'a, S: Store + ?Sized> Importer<'a, S> {
    pub fn new(store: &'a mut S, resolver: &'a dyn BuildResolver) -> Self {
        Self { store, resolver }
    }

    /// Import a package
    ///
    /// # Arguments
    /// * `source` - JSON text or a decoded value; never modified
    /// * `replace` - Delete entities with colliding names instead of merging
    ///
    /// # Returns
    /// The summary, or `None` when the package imported nothing
    pub fn import(
        &mut self,
        source: impl Into<PackageSource>,
        replace: bool,
    ) -> Result<Option<ImportSummary>> {
        let package = parse_package(source)?;
        let version = migration::normalize(&package.meta.version, self.resolver)?;
        info!(
            version = %version.dotted,
            legacy = version.is_legacy,
            replace,
            "Importing package"
        );

        let mut summary = ImportSummary::default();
        for kind in EntityKind::ALL {
            for raw in package.records(kind) {
                let outcome = self.import_record(kind, raw, replace, version.is_legacy, &mut summary);
                match outcome {
                    Ok(()) => {}
                    Err(ImportError::InvalidEntity { kind, reason }) => {
                        warn!(%kind, %reason, "Skipping record");
                        summary.skipped.push(SkippedEntity { kind, reason });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if summary.is_empty() {
            info!("Package contained nothing to import");
            return Ok(None);
        }
        info!(imported = summary.total(), skipped = summary.skipped.len(), "Import complete");
        Ok(Some(summary))
    }

    fn import_record(
        &mut self,
        kind: EntityKind,
        raw: &Value,
        replace: bool,
        is_legacy: bool,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let store = &mut *self.store;
        match kind {
            EntityKind::Pod => {
                summary.record(&migration::import_pod(store, raw, replace, is_legacy)?);
            }
            EntityKind::Template => {
                summary.record(&migration::import_template(store, raw, replace)?);
            }
            EntityKind::Page => {
                summary.record(&migration::import_page(store, raw, replace)?);
            }
            EntityKind::Helper => {
                summary.record(&migration::import_helper(store, raw, replace)?);
            }
        }
        Ok(())
    }
}
