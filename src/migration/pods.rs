//! Pod migration
//!
//! Resolves one incoming pod record against the store: legacy records go
//! through the full 1.x -> 2.0 pipeline, current records pass through
//! unchanged apart from identity stripping. The resolved pod is merged onto
//! the existing one (or replaces it) and saved.

use super::conversions::remap_field;
use super::legacy_types::LegacyPod;
use crate::error::{ImportError, Result};
use crate::model::{Entity, EntityKind, Field, FieldType, Options, Pod, PodRecord};
use crate::store::Collection;
use crate::validation::{RESERVED_FIELD_NAMES, clean_name, label_from_name, unique_field_name};
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, info};

fn core_datetime(name: &str, label: &str, weight: i64) -> Field {
    let mut field = Field::new(name, FieldType::Datetime);
    field.label = label.to_string();
    field.weight = weight;
    field.options.insert("datetime_format".to_string(), json!("ymd_slash"));
    field.options.insert("datetime_time_type".to_string(), json!("12"));
    field.options.insert("datetime_time_format".to_string(), json!("h_mm_ss_A"));
    field
}

/// Bookkeeping fields added to every pod created from a legacy package
///
/// `author` defaults to the acting user through the `{@user.ID}` magic tag.
pub fn core_fields() -> Vec<Field> {
    let mut author = Field::new("author", FieldType::Pick);
    author.label = "Author".to_string();
    author.weight = 3;
    author.pick_object = Some("user".to_string());
    author.options.insert("pick_format_type".to_string(), json!("single"));
    author.options.insert("pick_format_single".to_string(), json!("autocomplete"));
    author.options.insert("default_value".to_string(), json!("{@user.ID}"));

    vec![
        core_datetime("created", "Date Created", 1),
        core_datetime("modified", "Date Modified", 2),
        author,
    ]
}

/// `1 == value` under loose comparison
fn is_one(value: &Value) -> bool {
    crate::model::serde_impl::coerce_int(value) == 1
}

/// Move legacy pod settings to their 2.0 names
fn relocate_pod_keys(pod: &mut LegacyPod) {
    if let Some(toplevel) = pod.is_toplevel.take() {
        pod.show_in_menu = Some(json!(i64::from(is_one(&toplevel))));
    }
    if let Some(detail_page) = pod.detail_page.take() {
        pod.detail_url = Some(detail_page);
    }
    if let Some(helpers) = pod.before_helpers.take() {
        pod.pre_save_helpers = Some(helpers);
    }
    if let Some(helpers) = pod.after_helpers.take() {
        pod.post_save_helpers = Some(helpers);
    }
    if let Some(helpers) = pod.pre_drop_helpers.take() {
        pod.pre_delete_helpers = Some(helpers);
    }
    if let Some(helpers) = pod.post_drop_helpers.take() {
        pod.post_delete_helpers = Some(helpers);
    }
}

/// Remap legacy fields, giving each a distinct non-reserved name
fn remap_fields(legacy: &LegacyPod) -> Vec<Field> {
    let mut taken = HashSet::new();
    legacy
        .fields
        .iter()
        .map(|source| {
            let mut field = remap_field(source);
            let name = unique_field_name(&field.name, &RESERVED_FIELD_NAMES, &taken);
            if name != field.name {
                debug!(pod = %legacy.name, from = %field.name, to = %name, "Renamed legacy field");
            }
            taken.insert(name.clone());
            field.name = name;
            field
        })
        .collect()
}

/// Rewrite a 1.x pod into a 2.0 pod record
///
/// # Arguments
/// * `legacy` - The pod as found in the package
/// * `is_new` - The target pod has no persisted identity yet; core fields
///   are prepended only in that case
///
/// # Returns
/// A fully populated record with the fixed 2.0 shape
pub fn migrate_legacy_pod(mut legacy: LegacyPod, is_new: bool) -> PodRecord {
    let mut fields = remap_fields(&legacy);

    if is_new {
        let mut with_core = core_fields();
        with_core.append(&mut fields);
        fields = with_core;
    }

    if legacy.label.trim().is_empty() {
        legacy.label = label_from_name(&legacy.name);
    }

    relocate_pod_keys(&mut legacy);

    let text = |value: Option<String>| json!(value.unwrap_or_default());
    let show_in_menu = legacy.show_in_menu.as_ref().is_some_and(is_one);

    let mut options = Options::new();
    options.insert("pre_save_helpers".to_string(), text(legacy.pre_save_helpers));
    options.insert("post_save_helpers".to_string(), text(legacy.post_save_helpers));
    options.insert("pre_delete_helpers".to_string(), text(legacy.pre_delete_helpers));
    options.insert("post_delete_helpers".to_string(), text(legacy.post_delete_helpers));
    options.insert("show_in_menu".to_string(), json!(i64::from(show_in_menu)));
    options.insert("detail_url".to_string(), text(legacy.detail_url));
    options.insert("pod_index".to_string(), json!("name"));

    PodRecord {
        id: None,
        name: Some(clean_name(&legacy.name)),
        label: Some(legacy.label),
        pod_type: Some("pod".to_string()),
        storage: Some("table".to_string()),
        fields: Some(fields),
        options: Some(options),
        extra: Options::new(),
    }
}

/// A pod record parsed in the shape of its package generation
enum Incoming {
    Legacy(LegacyPod),
    Current(PodRecord),
}

/// Read the identifying name of a raw pod before any rewriting
fn raw_name(raw: &Value) -> String {
    raw.get("name")
        .map(crate::model::serde_impl::coerce_string)
        .unwrap_or_default()
}

/// Import one pod record
///
/// # Arguments
/// * `store` - Persistence collaborator
/// * `raw` - The pod object from the package (never mutated)
/// * `replace` - Delete an existing pod of the same name instead of merging
/// * `is_legacy` - The package predates 2.0
///
/// # Returns
/// The saved pod, or `InvalidEntity` when the record has no usable name
pub fn import_pod<S>(store: &mut S, raw: &Value, replace: bool, is_legacy: bool) -> Result<Pod>
where
    S: Collection<Pod> + ?Sized,
{
    // Legacy names are cleaned before they are stored, so look them up cleaned
    let lookup = if is_legacy {
        clean_name(&raw_name(raw))
    } else {
        raw_name(raw)
    };
    if lookup.trim().is_empty() {
        return Err(ImportError::invalid_entity(EntityKind::Pod, "missing name"));
    }

    let invalid = |e: serde_json::Error| {
        ImportError::invalid_entity(EntityKind::Pod, format!("'{}': {}", lookup, e))
    };
    let incoming = if is_legacy {
        Incoming::Legacy(serde_json::from_value(raw.clone()).map_err(invalid)?)
    } else {
        Incoming::Current(serde_json::from_value(raw.clone()).map_err(invalid)?)
    };

    let existing = store.load_by_name(&lookup)?;
    let base = match existing {
        Some(existing) if replace => {
            if let Some(id) = existing.id() {
                info!(pod = %lookup, id, "Replacing existing pod");
                store.delete(id)?;
            }
            None
        }
        other => other,
    };
    let is_new = base.as_ref().and_then(|pod| pod.id).is_none();

    let mut record = match incoming {
        Incoming::Legacy(legacy) => migrate_legacy_pod(legacy, is_new),
        Incoming::Current(record) => record,
    };
    record.id = None;

    let base = base.unwrap_or_else(|| Pod::new(String::new()));
    let mut pod = record.merge_onto(base);
    pod.strip_field_ids();

    debug!(pod = %pod.name, fields = pod.fields.len(), is_legacy, "Saving pod");
    let id = store.save(pod.clone())?;
    pod.id = Some(id);
    Ok(pod)
}
