//! In-memory storage backend
//!
//! Backs both store traits with plain hash maps behind a single lock.
//! Owners and pets live in separate tables linked by id, so a saved
//! owner's pet collection is reconciled against the pet table on every
//! save and removed wholesale on delete. One lock over all tables keeps
//! each store call atomic.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::model::{Owner, Pet, PetType};
use crate::core::store::{OwnerStore, PetTypeStore};

/// Owner row without its pet collection; pets are joined on read.
#[derive(Debug, Clone)]
struct OwnerRow {
    first_name: String,
    last_name: String,
    address: Option<String>,
    city: Option<String>,
    telephone: Option<String>,
    pet_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Clone)]
struct PetRow {
    name: String,
    birth_date: Option<NaiveDate>,
    pet_type: Option<PetType>,
    owner_id: Uuid,
}

#[derive(Debug, Default)]
struct Tables {
    owners: HashMap<Uuid, OwnerRow>,
    pets: HashMap<Uuid, PetRow>,
    pet_types: HashMap<Uuid, PetType>,
}

/// Thread-safe in-memory store for owners, pets and pet types.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn materialize(&self, id: &Uuid, row: &OwnerRow, with_pets: bool) -> Owner {
        let mut owner = Owner {
            id: *id,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            address: row.address.clone(),
            city: row.city.clone(),
            telephone: row.telephone.clone(),
            pets: Vec::new(),
        };
        if with_pets {
            for pet_id in &row.pet_ids {
                if let Some(pet) = self.pets.get(pet_id) {
                    owner.pets.push(Pet {
                        id: *pet_id,
                        name: pet.name.clone(),
                        birth_date: pet.birth_date,
                        pet_type: pet.pet_type.clone(),
                        owner_id: Some(*id),
                    });
                }
            }
            owner.pets.sort_by(|a, b| a.name.cmp(&b.name));
        }
        owner
    }

    fn collect_sorted(&self, filter: impl Fn(&OwnerRow) -> bool) -> Vec<Owner> {
        let mut owners: Vec<Owner> = self
            .owners
            .iter()
            .filter(|(_, row)| filter(row))
            .map(|(id, row)| self.materialize(id, row, true))
            .collect();
        // HashMap iteration order is arbitrary; keep listings stable.
        owners.sort_by(|a, b| {
            (&a.last_name, &a.first_name, &a.id).cmp(&(&b.last_name, &b.first_name, &b.id))
        });
        owners
    }
}

#[async_trait]
impl OwnerStore for InMemoryStore {
    async fn save(&self, owner: Owner) -> Result<Owner> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;

        // The incoming pet collection is authoritative: pets the owner
        // no longer references are dropped from the pet table.
        let mut pet_ids = BTreeSet::new();
        let stale: Vec<Uuid> = tables
            .owners
            .get(&owner.id)
            .map(|previous| previous.pet_ids.iter().copied().collect())
            .unwrap_or_default();
        for pet_id in stale {
            tables.pets.remove(&pet_id);
        }
        for pet in &owner.pets {
            pet_ids.insert(pet.id);
            tables.pets.insert(
                pet.id,
                PetRow {
                    name: pet.name.clone(),
                    birth_date: pet.birth_date,
                    pet_type: pet.pet_type.clone(),
                    owner_id: owner.id,
                },
            );
        }
        let row = OwnerRow {
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            address: owner.address.clone(),
            city: owner.city.clone(),
            telephone: owner.telephone.clone(),
            pet_ids,
        };
        tables.owners.insert(owner.id, row.clone());

        Ok(tables.materialize(&owner.id, &row, true))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Owner>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables
            .owners
            .get(id)
            .map(|row| tables.materialize(id, row, false)))
    }

    async fn find_by_id_with_pets(&self, id: &Uuid) -> Result<Option<Owner>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables
            .owners
            .get(id)
            .map(|row| tables.materialize(id, row, true)))
    }

    async fn exists_by_telephone(&self, telephone: &str) -> Result<bool> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables
            .owners
            .values()
            .any(|row| row.telephone.as_deref() == Some(telephone)))
    }

    async fn find_by_last_name(&self, prefix: &str) -> Result<Vec<Owner>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables.collect_sorted(|row| row.last_name.starts_with(prefix)))
    }

    async fn list_all(&self) -> Result<Vec<Owner>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables.collect_sorted(|_| true))
    }

    async fn count(&self) -> Result<usize> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables.owners.len())
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        if let Some(row) = tables.owners.remove(id) {
            for pet_id in &row.pet_ids {
                tables.pets.remove(pet_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PetTypeStore for InMemoryStore {
    async fn save_pet_type(&self, pet_type: PetType) -> Result<PetType> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        tables.pet_types.insert(pet_type.id, pet_type.clone());
        Ok(pet_type)
    }

    async fn find_pet_type(&self, id: &Uuid) -> Result<Option<PetType>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        Ok(tables.pet_types.get(id).cloned())
    }

    async fn list_pet_types(&self) -> Result<Vec<PetType>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("lock poisoned: {e}"))?;
        let mut types: Vec<PetType> = tables.pet_types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }
}
