//! Sample data loading
//!
//! Populates an empty store with a small well-known data set so the
//! service is usable out of the box. Writes go straight through the
//! store; the data set is known-good, so the rule layer is not
//! involved.

use anyhow::Result;
use chrono::NaiveDate;

use crate::core::model::{Owner, Pet, PetType};
use crate::core::store::{OwnerStore, PetTypeStore};

/// Load the sample data set if the owner table is empty. Returns true
/// when seeding took place.
pub async fn seed_sample_data(
    owners: &dyn OwnerStore,
    pet_types: &dyn PetTypeStore,
) -> Result<bool> {
    if owners.count().await? > 0 {
        tracing::info!("store already populated, skipping sample data");
        return Ok(false);
    }

    let mut cat = None;
    let mut dog = None;
    let mut lizard = None;
    for name in ["cat", "dog", "lizard", "snake", "bird", "hamster"] {
        let saved = pet_types.save_pet_type(PetType::new(name)).await?;
        match name {
            "cat" => cat = Some(saved),
            "dog" => dog = Some(saved),
            "lizard" => lizard = Some(saved),
            _ => {}
        }
    }

    let mut george = Owner::new("George", "Franklin");
    george.address = Some("110 W. Liberty St.".to_string());
    george.city = Some("Madison".to_string());
    george.telephone = Some("6085551023".to_string());
    if let Some(dog) = &dog {
        george.attach_pet(Pet::new("Leo", date(2020, 5, 10)).with_type(dog.clone()));
    }
    if let Some(cat) = &cat {
        george.attach_pet(Pet::new("Basil", date(2019, 8, 15)).with_type(cat.clone()));
    }
    owners.save(george).await?;

    let mut betty = Owner::new("Betty", "Davis");
    betty.address = Some("638 Cardinal Ave.".to_string());
    betty.city = Some("Sun Prairie".to_string());
    betty.telephone = Some("6085551749".to_string());
    if let Some(dog) = &dog {
        betty.attach_pet(Pet::new("Rosy", date(2021, 3, 20)).with_type(dog.clone()));
    }
    owners.save(betty).await?;

    let mut eduardo = Owner::new("Eduardo", "Rodriquez");
    eduardo.address = Some("2693 Commerce St.".to_string());
    eduardo.city = Some("McFarland".to_string());
    eduardo.telephone = Some("6085558763".to_string());
    if let Some(lizard) = &lizard {
        eduardo.attach_pet(Pet::new("Jewel", date(2022, 1, 5)).with_type(lizard.clone()));
    }
    owners.save(eduardo).await?;

    tracing::info!("loaded sample data: 3 owners, 6 pet types");
    Ok(true)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}
