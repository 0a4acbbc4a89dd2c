//! Template, page and helper importers
//!
//! Each importer follows the same steps: parse the record, relocate legacy
//! keys, strip identity, pick the merge base (existing entity, or nothing
//! when replacing), merge and save. None of these entities go through the
//! legacy field pipeline.

use crate::error::{ImportError, Result};
use crate::model::{
    Entity, Helper, HelperPhase, HelperRecord, Page, PageRecord, Template, TemplateRecord,
};
use crate::store::Collection;
use crate::validation::trim_page_path;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

fn parse<E: Entity, R: DeserializeOwned>(raw: &Value) -> Result<R> {
    serde_json::from_value(raw.clone())
        .map_err(|e| ImportError::invalid_entity(E::KIND, e.to_string()))
}

fn required_name<E: Entity>(name: Option<String>) -> Result<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ImportError::invalid_entity(E::KIND, "missing name")),
    }
}

/// Existing entity to merge onto, deleting it first when replacing
fn merge_base<E, S>(store: &mut S, name: &str, replace: bool) -> Result<E>
where
    E: Entity + Default,
    S: Collection<E> + ?Sized,
{
    match store.load_by_name(name)? {
        Some(existing) if replace => {
            if let Some(id) = existing.id() {
                info!(kind = %E::KIND, name, id, "Replacing existing entity");
                store.delete(id)?;
            }
            Ok(E::default())
        }
        Some(existing) => Ok(existing),
        None => Ok(E::default()),
    }
}

fn persist<E, S>(store: &mut S, mut entity: E) -> Result<E>
where
    E: Entity,
    S: Collection<E> + ?Sized,
{
    debug!(kind = %E::KIND, name = entity.name(), "Saving entity");
    let id = store.save(entity.clone())?;
    entity.set_id(Some(id));
    Ok(entity)
}

/// Import one template record
pub fn import_template<S>(store: &mut S, raw: &Value, replace: bool) -> Result<Template>
where
    S: Collection<Template> + ?Sized,
{
    let mut record: TemplateRecord = parse::<Template, _>(raw)?;
    record.id = None;
    let name = required_name::<Template>(record.name.clone())?;

    let base = merge_base(store, &name, replace)?;
    persist(store, record.merge_onto(base))
}

/// Import one page record
///
/// 1.x pages are named by `uri` and carry `phpcode`; `name` wins over `uri`
/// when both are present. The final name has surrounding `/` trimmed.
pub fn import_page<S>(store: &mut S, raw: &Value, replace: bool) -> Result<Page>
where
    S: Collection<Page> + ?Sized,
{
    let mut record: PageRecord = parse::<Page, _>(raw)?;
    record.id = None;

    let name = match record.name.take().filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => required_name::<Page>(record.uri.take())?,
    };
    let name = trim_page_path(&name);
    if name.trim().is_empty() {
        return Err(ImportError::invalid_entity(Page::KIND, "page path is empty"));
    }
    record.uri = None;
    record.name = Some(name.clone());
    if let Some(code) = record.phpcode.take() {
        record.code = Some(code);
    }

    let base = merge_base(store, &name, replace)?;
    persist(store, record.merge_onto(base))
}

/// Map 1.x helper phase tokens to their 2.0 names
pub fn relocate_helper_phase(phase: HelperPhase) -> HelperPhase {
    match phase {
        HelperPhase::Other(token) if token == "before" => HelperPhase::PreSave,
        HelperPhase::Other(token) if token == "after" => HelperPhase::PostSave,
        other => other,
    }
}

/// Import one helper record
///
/// The phase stays under the `type` key.
pub fn import_helper<S>(store: &mut S, raw: &Value, replace: bool) -> Result<Helper>
where
    S: Collection<Helper> + ?Sized,
{
    let mut record: HelperRecord = parse::<Helper, _>(raw)?;
    record.id = None;
    let name = required_name::<Helper>(record.name.clone())?;

    if let Some(code) = record.phpcode.take() {
        record.code = Some(code);
    }
    record.helper_type = record.helper_type.map(relocate_helper_phase);

    let base = merge_base(store, &name, replace)?;
    persist(store, record.merge_onto(base))
}
