//! Current-generation (2.0) entity models
//!
//! This module contains the typed entities that are persisted by the store
//! and carried by packages. It is split into submodules:
//! - `pod`: Pods and their fields
//! - `auxiliary`: templates, pages and helpers
//! - `merge`: the two merge strategies (override and deep)
//! - `serde_impl`: lenient deserializers for loosely typed package payloads

mod auxiliary;
pub mod merge;
mod pod;
pub(crate) mod serde_impl;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export all public types
pub use auxiliary::{Helper, HelperPhase, HelperRecord, Page, PageRecord, Template, TemplateRecord};
pub use pod::{Field, FieldType, Pod, PodRecord};

/// Free-form attribute map (field options, pod options, unknown attributes)
pub type Options = serde_json::Map<String, serde_json::Value>;

/// The four entity collections a package can carry
///
/// Variants are declared in import order, so ordered maps keyed by kind
/// iterate pods first and helpers last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "pods")]
    Pod,
    #[serde(rename = "templates")]
    Template,
    #[serde(rename = "pages")]
    Page,
    #[serde(rename = "helpers")]
    Helper,
}

impl EntityKind {
    /// All kinds in import order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Pod,
        EntityKind::Template,
        EntityKind::Page,
        EntityKind::Helper,
    ];

    /// Package collection key for this kind
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Pod => "pods",
            EntityKind::Template => "templates",
            EntityKind::Page => "pages",
            EntityKind::Helper => "helpers",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Pod => "pod",
            EntityKind::Template => "template",
            EntityKind::Page => "page",
            EntityKind::Helper => "helper",
        };
        f.write_str(name)
    }
}

/// A persisted, named entity
///
/// Identity (`id`) is owned by the store: it is assigned on first save and
/// never carried across an import.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: Option<u64>);

    fn name(&self) -> &str;

    /// Display label recorded in the import summary
    fn label(&self) -> &str {
        self.name()
    }
}
