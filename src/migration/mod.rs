//! Migration of package entities between schema generations
//!
//! This module turns the records found in a package into current-generation
//! entities and hands them to the store.
//!
//! ## Generations
//!
//! - **1.x (legacy)**: pods carry `coltype` fields, pre-2.0 setting names
//!   (`is_toplevel`, `detail_page`, `before_helpers`, ...) and no core
//!   fields. Version tags are digit strings or build numbers.
//! - **2.0 (current)**: pods carry typed fields with option maps; records
//!   pass through unchanged apart from identity stripping.
//!
//! ## Pipeline
//!
//! `version` classifies the package once; `pods` runs each pod through
//! `conversions` (field types and default options) and the reserved-name
//! rules, then merges onto the existing pod. `auxiliary` handles templates,
//! pages and helpers, which only need legacy key relocation.

pub mod auxiliary;
pub mod conversions;
pub mod legacy_types;
pub mod pods;
pub mod version;

// Re-export public types and functions
pub use auxiliary::{import_helper, import_page, import_template, relocate_helper_phase};
pub use conversions::{remap_field, remap_field_type, remap_pick_object};
pub use legacy_types::{LegacyField, LegacyFieldType, LegacyPod};
pub use pods::{core_fields, import_pod, migrate_legacy_pod};
pub use version::{BuildResolver, BuildTable, NormalizedVersion, normalize};
