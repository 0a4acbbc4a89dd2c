//! Persistence collaborator interface
//!
//! The importer never owns persisted state: it loads existing entities,
//! asks for deletions and hands fully-resolved entities back for storage.
//! Identity assignment belongs to the store.

mod catalog;

use crate::model::{Entity, Helper, Page, Pod, Template};
use anyhow::Result;

pub use catalog::Catalog;

/// Load/save/delete operations for one entity kind
pub trait Collection<E: Entity> {
    /// Load the entity with the given name
    fn load_by_name(&self, name: &str) -> Result<Option<E>>;

    /// Load all entities (`None`) or the entities with the given ids
    fn load_many(&self, ids: Option<&[u64]>) -> Result<Vec<E>>;

    /// Delete the entity with the given id
    fn delete(&mut self, id: u64) -> Result<()>;

    /// Insert or update an entity, returning its id
    fn save(&mut self, entity: E) -> Result<u64>;
}

/// A store serving every entity kind a package can carry
pub trait Store:
    Collection<Pod> + Collection<Template> + Collection<Page> + Collection<Helper>
{
}

impl<T> Store for T where
    T: Collection<Pod> + Collection<Template> + Collection<Page> + Collection<Helper> + ?Sized
{
}
