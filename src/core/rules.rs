//! Business-rule checks for owner and pet mutations
//!
//! These are pure functions over in-memory entity state, invoked by
//! [`OwnerService`](crate::core::service::OwnerService) before every owner
//! save and every pet addition. Each function evaluates an ordered list of
//! predicate/error pairs: the first violated rule wins and later rules are
//! not reported.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::core::error::CustomersError;
use crate::core::model::{Owner, Pet};

/// An owner holds at most this many pets at any time.
pub const MAX_PETS_PER_OWNER: usize = 10;

pub const MSG_TELEPHONE_TAKEN: &str = "this telephone is already registered";
pub const MSG_PET_NAMES_REPEAT: &str = "pet names must not repeat";
pub const MSG_BIRTH_DATE_IN_FUTURE: &str = "birth date cannot be in the future";
pub const MSG_PET_LIMIT_REACHED: &str = "an owner may register at most 10 pets";

/// Validate an owner before it is persisted (create and update).
///
/// `telephone_taken` answers "does any *other* owner currently hold the
/// candidate telephone"; the caller resolves it against the store and, on
/// update, skips the lookup entirely when the telephone is unchanged.
///
/// Rules, in order:
/// 1. a non-empty telephone already held elsewhere is a duplicate;
/// 2. a pet collection attached at save time (bulk creation) must not
///    carry repeated names.
pub fn check_save_owner(owner: &Owner, telephone_taken: bool) -> Result<(), CustomersError> {
    if owner.telephone.as_deref().is_some_and(|t| !t.is_empty()) && telephone_taken {
        return Err(CustomersError::duplicate(MSG_TELEPHONE_TAKEN));
    }

    if !owner.pets.is_empty() {
        let distinct: HashSet<&str> = owner.pets.iter().map(|p| p.name.as_str()).collect();
        if distinct.len() != owner.pets.len() {
            return Err(CustomersError::business_rule(MSG_PET_NAMES_REPEAT));
        }
    }

    Ok(())
}

/// Validate a pet against the owner it is about to be attached to.
///
/// The caller has already resolved existence (owner loaded with pets
/// eagerly). The remaining rules run in a fixed order: birth-date sanity,
/// then capacity, then the name scan. Date and capacity are local checks
/// independent of other pets, so the cheapest distinguishing error
/// surfaces first; a pet without a birth date skips the date rule.
pub fn check_add_pet(owner: &Owner, pet: &Pet, today: NaiveDate) -> Result<(), CustomersError> {
    let rules = [
        (
            pet.birth_date.is_some_and(|d| d > today),
            MSG_BIRTH_DATE_IN_FUTURE,
        ),
        (owner.pets.len() >= MAX_PETS_PER_OWNER, MSG_PET_LIMIT_REACHED),
        (
            owner.pets.iter().any(|p| p.name == pet.name),
            MSG_PET_NAMES_REPEAT,
        ),
    ];

    for (violated, message) in rules {
        if violated {
            return Err(CustomersError::business_rule(message));
        }
    }

    Ok(())
}
