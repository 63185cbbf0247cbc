//! Storage traits for owner and pet-type persistence
//!
//! The service layer is agnostic to the underlying storage mechanism; any
//! relational or in-memory backend can implement these traits.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::core::model::{Owner, PetType};

/// Entity-store boundary for owners and their pets.
///
/// Pets have no standalone lifecycle here: they are written and deleted
/// only through the owner that holds them.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// Upsert an owner together with its pet collection.
    ///
    /// The pet collection on the passed owner is authoritative: pets
    /// missing from it are removed, new ones are inserted (cascade
    /// semantics). Either everything commits or nothing does.
    async fn save(&self, owner: Owner) -> Result<Owner>;

    /// Look up an owner by id, without loading its pets.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Owner>>;

    /// Look up an owner by id with its pets eagerly loaded.
    async fn find_by_id_with_pets(&self, id: &Uuid) -> Result<Option<Owner>>;

    /// Boolean membership test: does any owner hold this telephone.
    async fn exists_by_telephone(&self, telephone: &str) -> Result<bool>;

    /// Case-sensitive prefix match against stored last names, pets
    /// eagerly loaded. No matches yields an empty list.
    async fn find_by_last_name(&self, prefix: &str) -> Result<Vec<Owner>>;

    /// List all owners with pets eagerly loaded.
    async fn list_all(&self) -> Result<Vec<Owner>>;

    /// Count stored owners.
    async fn count(&self) -> Result<usize>;

    /// Delete an owner, cascading deletion of all its pets.
    async fn delete_by_id(&self, id: &Uuid) -> Result<()>;
}

/// Lookup-table store for pet types.
#[async_trait]
pub trait PetTypeStore: Send + Sync {
    async fn save_pet_type(&self, pet_type: PetType) -> Result<PetType>;

    async fn find_pet_type(&self, id: &Uuid) -> Result<Option<PetType>>;

    /// List all pet types, sorted by name.
    async fn list_pet_types(&self) -> Result<Vec<PetType>>;
}
