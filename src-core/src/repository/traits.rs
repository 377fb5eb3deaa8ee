//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations sit on a key-value slot (SQLite, in-memory, etc.)

use async_trait::async_trait;
use crate::domain::{DomainError, DomainResult, Entity};

/// Whole-value string storage addressed by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if never written
    async fn get_item(&self, key: &str) -> DomainResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> DomainResult<()>;
}

/// Ordered collection repository
///
/// Generic over any Entity type. Order is insertion order.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity + 'static>: Send + Sync {
    /// Load every entity, empty if nothing was ever saved
    async fn load_all(&self) -> DomainResult<Vec<T>>;

    /// Overwrite the whole collection
    async fn save_all(&self, entities: &[T]) -> DomainResult<()>;

    /// Append an entity; fails with `Conflict` if the id is taken
    async fn add(&self, entity: &T) -> DomainResult<()> {
        let mut all = self.load_all().await?;
        if all.iter().any(|e| e.id() == entity.id()) {
            return Err(DomainError::Conflict("entity with this id already exists".to_string()));
        }
        all.push(entity.clone());
        self.save_all(&all).await
    }

    /// Patch the entity with `id` in place. Returns `false` (and writes
    /// nothing) when no entity has that id.
    async fn update(&self, id: &T::Id, patch: T::Patch) -> DomainResult<bool> {
        let mut all = self.load_all().await?;
        let Some(target) = all.iter_mut().find(|e| e.id() == id) else {
            return Ok(false);
        };
        target.apply(patch);
        self.save_all(&all).await?;
        Ok(true)
    }

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>> {
        Ok(self.load_all().await?.into_iter().find(|e| e.id() == id))
    }

    /// Drop every entity
    async fn reset(&self) -> DomainResult<()> {
        self.save_all(&[]).await
    }
}
