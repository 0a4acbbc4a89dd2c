use super::Collection;
use crate::model::{Entity, Helper, Page, Pod, Template};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// In-memory entity store
///
/// Entities are kept in insertion order, which gives stable diffs when the
/// catalog is written to disk. Ids come from a single counter shared by all
/// kinds and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Last id handed out
    #[serde(default)]
    pub id_counter: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pods: Vec<Pod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub helpers: Vec<Helper>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entities
    pub fn len(&self) -> usize {
        self.pods.len() + self.templates.len() + self.pages.len() + self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find_by_name<E: Entity>(entries: &[E], name: &str) -> Option<E> {
    entries.iter().find(|e| e.name() == name).cloned()
}

fn select<E: Entity>(entries: &[E], ids: Option<&[u64]>) -> Vec<E> {
    match ids {
        None => entries.to_vec(),
        Some(ids) => entries
            .iter()
            .filter(|e| e.id().is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect(),
    }
}

fn remove<E: Entity>(entries: &mut Vec<E>, id: u64) -> Result<()> {
    match entries.iter().position(|e| e.id() == Some(id)) {
        Some(pos) => {
            entries.remove(pos);
            Ok(())
        }
        None => bail!("{} {} does not exist", E::KIND, id),
    }
}

/// Update in place when the id is known, otherwise append under `fresh_id`
fn upsert<E: Entity>(entries: &mut Vec<E>, mut entity: E, fresh_id: u64) -> Result<u64> {
    if entity.name().is_empty() {
        bail!("Cannot save a {} without a name", E::KIND);
    }
    if let Some(id) = entity.id()
        && let Some(slot) = entries.iter_mut().find(|e| e.id() == Some(id))
    {
        *slot = entity;
        return Ok(id);
    }
    if entries.iter().any(|e| e.name() == entity.name()) {
        bail!("A {} named '{}' already exists", E::KIND, entity.name());
    }
    entity.set_id(Some(fresh_id));
    entries.push(entity);
    Ok(fresh_id)
}

macro_rules! impl_collection {
    ($ty:ty, $entries:ident) => {
        impl Collection<$ty> for Catalog {
            fn load_by_name(&self, name: &str) -> Result<Option<$ty>> {
                Ok(find_by_name(&self.$entries, name))
            }

            fn load_many(&self, ids: Option<&[u64]>) -> Result<Vec<$ty>> {
                Ok(select(&self.$entries, ids))
            }

            fn delete(&mut self, id: u64) -> Result<()> {
                remove(&mut self.$entries, id)
            }

            fn save(&mut self, entity: $ty) -> Result<u64> {
                let fresh = self.id_counter + 1;
                let id = upsert(&mut self.$entries, entity, fresh)?;
                if id == fresh {
                    self.id_counter = fresh;
                }
                Ok(id)
            }
        }
    };
}

impl_collection!(Pod, pods);
impl_collection!(Template, templates);
impl_collection!(Page, pages);
impl_collection!(Helper, helpers);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_assigns_ids() {
        let mut catalog = Catalog::new();
        let first = catalog.save(Pod::new("books")).unwrap();
        let second = catalog.save(Template {
            name: "book_list".to_string(),
            ..Default::default()
        });
        assert_eq!(first, 1);
        assert_eq!(second.unwrap(), 2);
        assert_eq!(catalog.id_counter, 2);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_save_with_known_id_updates_in_place() {
        let mut catalog = Catalog::new();
        let id = catalog.save(Pod::new("books")).unwrap();

        let mut pod: Pod = catalog.load_by_name("books").unwrap().unwrap();
        pod.label = "Library".to_string();
        assert_eq!(catalog.save(pod).unwrap(), id);

        let reloaded: Pod = catalog.load_by_name("books").unwrap().unwrap();
        assert_eq!(reloaded.label, "Library");
        assert_eq!(catalog.pods.len(), 1);
    }

    #[test]
    fn test_save_rejects_duplicate_name_without_id() {
        let mut catalog = Catalog::new();
        catalog.save(Pod::new("books")).unwrap();
        assert!(catalog.save(Pod::new("books")).is_err());
    }

    #[test]
    fn test_delete_and_load_many() {
        let mut catalog = Catalog::new();
        let a = catalog.save(Pod::new("a")).unwrap();
        let b = catalog.save(Pod::new("b")).unwrap();
        let _c = catalog.save(Pod::new("c")).unwrap();

        let picked: Vec<Pod> = catalog.load_many(Some(&[a, b][..])).unwrap();
        assert_eq!(picked.len(), 2);

        Collection::<Pod>::delete(&mut catalog, a).unwrap();
        let all: Vec<Pod> = catalog.load_many(None).unwrap();
        assert_eq!(all.len(), 2);
        assert!(Collection::<Pod>::delete(&mut catalog, a).is_err());
    }
}
