//! Domain entities for the customers service
//!
//! `Owner` exclusively owns its pets: deleting an owner cascades to the
//! pets, and a pet is only ever attached to exactly one owner. To avoid a
//! live object cycle, the pet side of the relationship is a plain
//! `owner_id` back-reference rather than a reference to the owner value.

use chrono::NaiveDate;
use uuid::Uuid;

/// A clinic customer record; root entity of the ownership hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Exactly 10 digits when present; globally unique across owners.
    pub telephone: Option<String>,
    /// Owned pet collection. Empty when the owner was loaded without an
    /// eager pet fetch.
    pub pets: Vec<Pet>,
}

impl Owner {
    /// Create a new owner with a fresh surrogate id and no pets.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: None,
            city: None,
            telephone: None,
            pets: Vec::new(),
        }
    }

    /// Attach a pet to this owner, maintaining the back-reference.
    pub fn attach_pet(&mut self, mut pet: Pet) {
        pet.owner_id = Some(self.id);
        self.pets.push(pet);
    }
}

/// An animal record, always eventually attached to exactly one [`Owner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    /// Never strictly after the current date once attached.
    pub birth_date: Option<NaiveDate>,
    pub pet_type: Option<PetType>,
    /// Set when the pet is attached to an owner.
    pub owner_id: Option<Uuid>,
}

impl Pet {
    /// Create a new unattached pet with a fresh surrogate id.
    pub fn new(name: impl Into<String>, birth_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            birth_date,
            pet_type: None,
            owner_id: None,
        }
    }

    pub fn with_type(mut self, pet_type: PetType) -> Self {
        self.pet_type = Some(pet_type);
        self
    }
}

/// A categorical lookup value for pets (species).
#[derive(Debug, Clone, PartialEq)]
pub struct PetType {
    pub id: Uuid,
    pub name: String,
}

impl PetType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Input for owner creation.
///
/// The pet collection is only meaningful on this path: bulk creation may
/// carry pets, and the save-time name scan runs over them.
#[derive(Debug, Clone, Default)]
pub struct NewOwner {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub telephone: Option<String>,
    pub pets: Vec<NewPet>,
}

/// Input for owner update.
///
/// Deliberately carries no pet collection: the update path overwrites
/// name/address/city, touches the telephone only when it changed, and
/// leaves the pet set alone.
#[derive(Debug, Clone, Default)]
pub struct OwnerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub telephone: Option<String>,
}

/// Input for pet creation (both the add-pet operation and bulk owner
/// creation).
#[derive(Debug, Clone, Default)]
pub struct NewPet {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub type_id: Option<Uuid>,
}
