//! Wire records for the REST surface
//!
//! Inbound payloads carry their own field-level validation (blank names,
//! telephone shape); everything beyond field shape is a business rule
//! and lives in [`crate::core::rules`]. Outbound records mirror the
//! domain types one-to-one.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::model::{NewOwner, NewPet, Owner, OwnerUpdate, Pet, PetType};

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{10}$").unwrap_or_else(|e| panic!("invalid telephone regex: {e}"))
});

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

// ── outbound ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OwnerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub telephone: Option<String>,
    pub pets: Vec<PetDto>,
}

#[derive(Debug, Serialize)]
pub struct PetDto {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub pet_type: Option<PetTypeDto>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PetTypeDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Owner> for OwnerDto {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id,
            first_name: owner.first_name,
            last_name: owner.last_name,
            address: owner.address,
            city: owner.city,
            telephone: owner.telephone,
            pets: owner.pets.into_iter().map(PetDto::from).collect(),
        }
    }
}

impl From<Pet> for PetDto {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            birth_date: pet.birth_date,
            pet_type: pet.pet_type.map(PetTypeDto::from),
            owner_id: pet.owner_id,
        }
    }
}

impl From<PetType> for PetTypeDto {
    fn from(pet_type: PetType) -> Self {
        Self {
            id: pet_type.id,
            name: pet_type.name,
        }
    }
}

// ── inbound ──────────────────────────────────────────────────────────────

/// Owner payload, shared by create and update. Updates ignore the pet
/// collection; pets are managed through the add-pet endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct OwnerPayload {
    #[validate(custom(function = not_blank, message = "first name must not be blank"))]
    pub first_name: String,
    #[validate(custom(function = not_blank, message = "last name must not be blank"))]
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(regex(path = *TELEPHONE_RE, message = "telephone must be exactly 10 digits"))]
    pub telephone: Option<String>,
    #[serde(default)]
    pub pets: Vec<PetPayload>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PetPayload {
    #[validate(custom(function = not_blank, message = "pet name must not be blank"))]
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub type_id: Option<Uuid>,
}

impl OwnerPayload {
    pub fn into_new_owner(self) -> NewOwner {
        NewOwner {
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            city: self.city,
            telephone: self.telephone,
            pets: self.pets.into_iter().map(PetPayload::into_new_pet).collect(),
        }
    }

    pub fn into_update(self) -> OwnerUpdate {
        OwnerUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            city: self.city,
            telephone: self.telephone,
        }
    }
}

impl PetPayload {
    pub fn into_new_pet(self) -> NewPet {
        NewPet {
            name: self.name,
            birth_date: self.birth_date,
            type_id: self.type_id,
        }
    }
}
