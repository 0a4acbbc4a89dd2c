use super::{Meta, Selection, Selector};
use crate::model::{Entity, Helper, Page, Pod, Template};
use crate::store::{Collection, Store};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Package as written by the exporter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageEnvelope {
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pods: Option<Vec<Pod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<Template>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helpers: Option<Vec<Helper>>,
}

fn collect<E, S>(store: &S, selector: Option<&Selector>) -> Result<Option<Vec<E>>>
where
    E: Entity,
    S: Collection<E> + ?Sized,
{
    let Some(selector) = selector else {
        return Ok(None);
    };
    let entities = store
        .load_many(selector.ids())
        .with_context(|| format!("Failed to load {} for export", E::KIND.collection()))?;
    Ok(Some(entities))
}

/// Package exporter
///
/// Current-generation entities are written verbatim; no remapping applies.
pub struct Exporter {
    schema_version: String,
}

impl Exporter {
    /// Create an exporter stamping packages with `schema_version`
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
        }
    }

    /// Collect the selected entities into an envelope stamped with `build`
    ///
    /// # Returns
    /// `None` when nothing was selected
    pub fn collect<S: Store + ?Sized>(
        &self,
        store: &S,
        selection: &Selection,
        build: i64,
    ) -> Result<Option<PackageEnvelope>> {
        if selection.is_empty() {
            return Ok(None);
        }

        let envelope = PackageEnvelope {
            meta: Meta {
                version: self.schema_version.clone(),
                build,
            },
            pods: collect::<Pod, S>(store, selection.pods.as_ref())?,
            templates: collect::<Template, S>(store, selection.templates.as_ref())?,
            pages: collect::<Page, S>(store, selection.pages.as_ref())?,
            helpers: collect::<Helper, S>(store, selection.helpers.as_ref())?,
        };
        info!(
            pods = envelope.pods.as_ref().map_or(0, Vec::len),
            templates = envelope.templates.as_ref().map_or(0, Vec::len),
            pages = envelope.pages.as_ref().map_or(0, Vec::len),
            helpers = envelope.helpers.as_ref().map_or(0, Vec::len),
            "Exported package"
        );
        Ok(Some(envelope))
    }

    /// Export the selected entities as package JSON, stamped with the
    /// current time
    pub fn export<S: Store + ?Sized>(&self, store: &S, selection: &Selection) -> Result<Option<String>> {
        let Some(envelope) = self.collect(store, selection, Utc::now().timestamp())? else {
            return Ok(None);
        };
        let text = serde_json::to_string(&envelope).context("Failed to serialize package")?;
        Ok(Some(text))
    }
}
