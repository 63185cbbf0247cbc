//! Owner business-logic service
//!
//! All business rules live here and in [`crate::core::rules`]; request
//! handlers only translate between wire records and these operations.
//! Every operation runs synchronously within one inbound request and one
//! store call sequence; a read-through cache fronts the identity lookup
//! and is evicted on every owner-mutating operation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{CustomersError, CustomersResult};
use crate::core::model::{NewOwner, NewPet, Owner, OwnerUpdate, Pet, PetType};
use crate::core::query::{PaginatedResponse, PaginationMeta, QueryParams, SortSpec};
use crate::core::rules;
use crate::core::store::{OwnerStore, PetTypeStore};

/// Service for owner CRUD and the add-pet operation.
pub struct OwnerService {
    store: Arc<dyn OwnerStore>,
    pet_types: Arc<dyn PetTypeStore>,
    /// Read-through cache for the identity lookup, keyed by owner id.
    /// Must be evicted whenever that owner is updated, added-to or
    /// deleted; the pet collections it serves would otherwise go stale.
    cache: RwLock<HashMap<Uuid, Owner>>,
}

impl OwnerService {
    pub fn new(store: Arc<dyn OwnerStore>, pet_types: Arc<dyn PetTypeStore>) -> Self {
        Self {
            store,
            pet_types,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new owner.
    ///
    /// The pet collection on the input, if any, is attached as part of the
    /// same save (bulk creation); the save-time rules cover both the
    /// telephone uniqueness check and the pet-name scan.
    pub async fn create_owner(&self, input: NewOwner) -> CustomersResult<Owner> {
        tracing::info!(
            "creating owner {} {}",
            input.first_name,
            input.last_name
        );

        let mut owner = Owner::new(input.first_name, input.last_name);
        owner.address = input.address;
        owner.city = input.city;
        owner.telephone = input.telephone;
        for new_pet in input.pets {
            let pet = self.build_pet(new_pet).await?;
            owner.attach_pet(pet);
        }

        let telephone_taken = match owner.telephone.as_deref() {
            Some(phone) if !phone.is_empty() => self.store.exists_by_telephone(phone).await?,
            _ => false,
        };
        rules::check_save_owner(&owner, telephone_taken)?;

        let saved = self.store.save(owner).await.inspect_err(|e| {
            tracing::error!("failed to save owner: {e}");
        })?;
        tracing::info!("owner saved with id {}", saved.id);
        Ok(saved)
    }

    /// Update an existing owner.
    ///
    /// Name, address and city are always overwritten; the telephone is
    /// touched only when the payload carries one and it differs from the
    /// current value, so a no-op telephone change never hits the
    /// uniqueness lookup. The stored pet collection is left alone.
    pub async fn update_owner(&self, id: &Uuid, input: OwnerUpdate) -> CustomersResult<Owner> {
        let mut owner = self
            .store
            .find_by_id_with_pets(id)
            .await?
            .ok_or_else(CustomersError::owner_not_found)?;

        owner.first_name = input.first_name;
        owner.last_name = input.last_name;
        owner.address = input.address;
        owner.city = input.city;

        let mut telephone_taken = false;
        if let Some(new_phone) = input.telephone {
            if owner.telephone.as_deref() != Some(new_phone.as_str()) {
                telephone_taken = self.store.exists_by_telephone(&new_phone).await?;
                owner.telephone = Some(new_phone);
            }
        }
        rules::check_save_owner(&owner, telephone_taken)?;

        let saved = self.store.save(owner).await?;
        self.invalidate(id)?;
        tracing::info!("owner {} updated", id);
        Ok(saved)
    }

    /// Delete an owner, cascading deletion of all its pets.
    pub async fn delete_owner(&self, id: &Uuid) -> CustomersResult<()> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(CustomersError::owner_not_found)?;

        self.store.delete_by_id(id).await?;
        self.invalidate(id)?;
        tracing::info!("owner {} deleted", id);
        Ok(())
    }

    /// Validate and attach a new pet to an existing owner.
    ///
    /// Existence is resolved first (owner loaded with pets), then the
    /// fixed rule order in [`rules::check_add_pet`] applies. On success
    /// the owner is persisted, cascading the pet insert.
    pub async fn add_pet(&self, owner_id: &Uuid, input: NewPet) -> CustomersResult<Pet> {
        let mut owner = self
            .store
            .find_by_id_with_pets(owner_id)
            .await?
            .ok_or_else(CustomersError::owner_not_found)?;

        let pet = self.build_pet(input).await?;
        rules::check_add_pet(&owner, &pet, Utc::now().date_naive())?;

        let pet_id = pet.id;
        owner.attach_pet(pet);
        let saved = self.store.save(owner).await?;
        self.invalidate(owner_id)?;

        let pet = saved
            .pets
            .into_iter()
            .find(|p| p.id == pet_id)
            .ok_or_else(|| {
                CustomersError::Internal("saved pet missing from owner".to_string())
            })?;
        tracing::info!("added pet {} to owner {}", pet.name, owner_id);
        Ok(pet)
    }

    /// Look up an owner by id with its pets, through the cache.
    pub async fn find_owner(&self, id: &Uuid) -> CustomersResult<Owner> {
        if let Some(owner) = self.cached(id)? {
            return Ok(owner);
        }

        let owner = self
            .store
            .find_by_id_with_pets(id)
            .await?
            .ok_or_else(CustomersError::owner_not_found)?;

        let mut cache = self.write_cache()?;
        cache.insert(*id, owner.clone());
        Ok(owner)
    }

    /// Boolean membership test against stored telephones.
    pub async fn telephone_in_use(&self, telephone: &str) -> CustomersResult<bool> {
        Ok(self.store.exists_by_telephone(telephone).await?)
    }

    /// List owners, optionally filtered by a case-sensitive surname
    /// prefix. Pure pass-through query; no business rules apply.
    pub async fn list_owners(&self, last_name: Option<&str>) -> CustomersResult<Vec<Owner>> {
        let owners = match last_name {
            Some(prefix) => self.store.find_by_last_name(prefix).await?,
            None => self.store.list_all().await?,
        };
        Ok(owners)
    }

    /// Offset/limit paginated listing with sortable fields.
    pub async fn list_owners_paged(
        &self,
        params: &QueryParams,
    ) -> CustomersResult<PaginatedResponse<Owner>> {
        let mut owners = self.store.list_all().await?;
        if let Some(spec) = params.sort_spec() {
            apply_sort(&mut owners, &spec);
        }

        let page = params.page();
        let limit = params.limit();
        let total = owners.len();
        let data: Vec<Owner> = owners
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Resolve the pet-type reference and build an unattached pet.
    async fn build_pet(&self, input: NewPet) -> CustomersResult<Pet> {
        let mut pet = Pet::new(input.name, input.birth_date);
        if let Some(type_id) = input.type_id {
            pet.pet_type = self.find_pet_type(&type_id).await?;
        }
        Ok(pet)
    }

    async fn find_pet_type(&self, id: &Uuid) -> CustomersResult<Option<PetType>> {
        Ok(self.pet_types.find_pet_type(id).await?)
    }

    fn cached(&self, id: &Uuid) -> CustomersResult<Option<Owner>> {
        let cache = self
            .cache
            .read()
            .map_err(|e| CustomersError::Internal(format!("cache lock poisoned: {e}")))?;
        Ok(cache.get(id).cloned())
    }

    fn write_cache(&self) -> CustomersResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Owner>>> {
        self.cache
            .write()
            .map_err(|e| CustomersError::Internal(format!("cache lock poisoned: {e}")))
    }

    fn invalidate(&self, id: &Uuid) -> CustomersResult<()> {
        self.write_cache()?.remove(id);
        Ok(())
    }
}

/// Sort owners in place. Unknown fields fall back to last-name order.
fn apply_sort(owners: &mut [Owner], spec: &SortSpec) {
    owners.sort_by(|a, b| match spec.field.as_str() {
        "first_name" => a.first_name.cmp(&b.first_name),
        "city" => a.city.cmp(&b.city),
        "telephone" => a.telephone.cmp(&b.telephone),
        _ => a.last_name.cmp(&b.last_name),
    });
    if spec.descending {
        owners.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{
        MSG_BIRTH_DATE_IN_FUTURE, MSG_PET_LIMIT_REACHED, MSG_PET_NAMES_REPEAT,
        MSG_TELEPHONE_TAKEN,
    };
    use crate::storage::InMemoryStore;
    use chrono::{Duration, NaiveDate, Utc};

    fn service() -> OwnerService {
        let store = Arc::new(InMemoryStore::new());
        OwnerService::new(store.clone(), store)
    }

    fn new_owner(first: &str, last: &str, telephone: Option<&str>) -> NewOwner {
        NewOwner {
            first_name: first.to_string(),
            last_name: last.to_string(),
            telephone: telephone.map(str::to_string),
            ..Default::default()
        }
    }

    fn pet(name: &str, birth_date: Option<NaiveDate>) -> NewPet {
        NewPet {
            name: name.to_string(),
            birth_date,
            type_id: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── create / telephone uniqueness ────────────────────────────────────

    #[tokio::test]
    async fn test_create_owner_assigns_identity() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", Some("0912345678")))
            .await
            .unwrap();
        assert_ne!(owner.id, Uuid::nil());
        assert_eq!(owner.telephone.as_deref(), Some("0912345678"));
    }

    #[tokio::test]
    async fn test_create_second_owner_with_same_telephone_is_duplicate() {
        let svc = service();
        let first = svc
            .create_owner(new_owner("George", "Franklin", Some("0912345678")))
            .await
            .unwrap();

        let err = svc
            .create_owner(new_owner("Betty", "Davis", Some("0912345678")))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomersError::Duplicate { .. }));
        assert_eq!(err.to_string(), MSG_TELEPHONE_TAKEN);

        // First owner unaffected
        let reloaded = svc.find_owner(&first.id).await.unwrap();
        assert_eq!(reloaded.first_name, "George");
    }

    #[tokio::test]
    async fn test_bulk_create_with_repeated_pet_names_is_rejected() {
        let svc = service();
        let mut input = new_owner("George", "Franklin", None);
        input.pets = vec![pet("Rex", None), pet("Rex", None)];

        let err = svc.create_owner(input).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_PET_NAMES_REPEAT);
    }

    #[tokio::test]
    async fn test_bulk_create_attaches_pets() {
        let svc = service();
        let mut input = new_owner("George", "Franklin", None);
        input.pets = vec![pet("Leo", Some(date(2020, 5, 10))), pet("Basil", None)];

        let owner = svc.create_owner(input).await.unwrap();
        assert_eq!(owner.pets.len(), 2);
        assert!(owner.pets.iter().all(|p| p.owner_id == Some(owner.id)));
    }

    // ── add pet ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_pet_then_duplicate_name_is_rejected() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();

        let rex = svc
            .add_pet(&owner.id, pet("Rex", Some(date(2020, 1, 1))))
            .await
            .unwrap();
        assert_eq!(rex.owner_id, Some(owner.id));

        let err = svc
            .add_pet(&owner.id, pet("Rex", Some(date(2021, 1, 1))))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MSG_PET_NAMES_REPEAT);

        // First pet remains attached, second was not persisted
        let reloaded = svc.find_owner(&owner.id).await.unwrap();
        assert_eq!(reloaded.pets.len(), 1);
        assert_eq!(reloaded.pets[0].name, "Rex");
        assert_eq!(reloaded.pets[0].birth_date, Some(date(2020, 1, 1)));
    }

    #[tokio::test]
    async fn test_add_pet_with_future_birth_date_is_rejected() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();

        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let err = svc
            .add_pet(&owner.id, pet("Rex", Some(tomorrow)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MSG_BIRTH_DATE_IN_FUTURE);

        let reloaded = svc.find_owner(&owner.id).await.unwrap();
        assert!(reloaded.pets.is_empty());
    }

    #[tokio::test]
    async fn test_add_eleventh_pet_is_rejected() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();

        for i in 1..=10 {
            svc.add_pet(&owner.id, pet(&format!("pet-{i}"), None))
                .await
                .unwrap();
        }

        let err = svc
            .add_pet(&owner.id, pet("pet-11", Some(date(2020, 1, 1))))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MSG_PET_LIMIT_REACHED);

        let reloaded = svc.find_owner(&owner.id).await.unwrap();
        assert_eq!(reloaded.pets.len(), 10);
    }

    #[tokio::test]
    async fn test_add_pet_to_unknown_owner_is_not_found() {
        let svc = service();
        let err = svc
            .add_pet(&Uuid::new_v4(), pet("Rex", None))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomersError::NotFound { .. }));
    }

    // ── update ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_overwrites_basic_fields() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();

        let updated = svc
            .update_owner(
                &owner.id,
                OwnerUpdate {
                    first_name: "Georgette".to_string(),
                    last_name: "Franklin".to_string(),
                    address: Some("110 W. Liberty St.".to_string()),
                    city: Some("Madison".to_string()),
                    telephone: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Georgette");
        assert_eq!(updated.city.as_deref(), Some("Madison"));
    }

    #[tokio::test]
    async fn test_update_with_unchanged_telephone_is_noop() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", Some("0912345678")))
            .await
            .unwrap();

        // Re-submitting the telephone the owner already holds must not
        // trip the duplicate check.
        let updated = svc
            .update_owner(
                &owner.id,
                OwnerUpdate {
                    first_name: "George".to_string(),
                    last_name: "Franklin".to_string(),
                    address: None,
                    city: None,
                    telephone: Some("0912345678".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.telephone.as_deref(), Some("0912345678"));
    }

    #[tokio::test]
    async fn test_update_to_taken_telephone_is_duplicate() {
        let svc = service();
        svc.create_owner(new_owner("George", "Franklin", Some("0912345678")))
            .await
            .unwrap();
        let betty = svc
            .create_owner(new_owner("Betty", "Davis", Some("0987654321")))
            .await
            .unwrap();

        let err = svc
            .update_owner(
                &betty.id,
                OwnerUpdate {
                    first_name: "Betty".to_string(),
                    last_name: "Davis".to_string(),
                    address: None,
                    city: None,
                    telephone: Some("0912345678".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CustomersError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_owner_is_not_found() {
        let svc = service();
        let err = svc
            .update_owner(&Uuid::new_v4(), OwnerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomersError::NotFound { .. }));
    }

    // ── delete ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_delete_owner_cascades_and_then_404s() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();
        svc.add_pet(&owner.id, pet("Rex", None)).await.unwrap();

        svc.delete_owner(&owner.id).await.unwrap();

        let err = svc.find_owner(&owner.id).await.unwrap_err();
        assert!(matches!(err, CustomersError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_unknown_owner_is_not_found() {
        let svc = service();
        let err = svc.delete_owner(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CustomersError::NotFound { .. }));
    }

    // ── cache behavior ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_cache_is_evicted_on_add_pet() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();

        // Prime the cache with the petless snapshot.
        let before = svc.find_owner(&owner.id).await.unwrap();
        assert!(before.pets.is_empty());

        svc.add_pet(&owner.id, pet("Rex", None)).await.unwrap();

        // A stale cache would still serve zero pets here.
        let after = svc.find_owner(&owner.id).await.unwrap();
        assert_eq!(after.pets.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_evicted_on_update() {
        let svc = service();
        let owner = svc
            .create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();
        svc.find_owner(&owner.id).await.unwrap();

        svc.update_owner(
            &owner.id,
            OwnerUpdate {
                first_name: "Georgette".to_string(),
                last_name: "Franklin".to_string(),
                address: None,
                city: None,
                telephone: None,
            },
        )
        .await
        .unwrap();

        let after = svc.find_owner(&owner.id).await.unwrap();
        assert_eq!(after.first_name, "Georgette");
    }

    // ── reads ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_surname_prefix_lookup_is_idempotent() {
        let svc = service();
        svc.create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();
        svc.create_owner(new_owner("Betty", "Davis", None))
            .await
            .unwrap();

        let first = svc.list_owners(Some("Fra")).await.unwrap();
        let second = svc.list_owners(Some("Fra")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].last_name, "Franklin");
    }

    #[tokio::test]
    async fn test_surname_prefix_without_match_is_empty_not_error() {
        let svc = service();
        svc.create_owner(new_owner("George", "Franklin", None))
            .await
            .unwrap();
        let owners = svc.list_owners(Some("Zz")).await.unwrap();
        assert!(owners.is_empty());
    }

    #[tokio::test]
    async fn test_telephone_in_use() {
        let svc = service();
        svc.create_owner(new_owner("George", "Franklin", Some("0912345678")))
            .await
            .unwrap();
        assert!(svc.telephone_in_use("0912345678").await.unwrap());
        assert!(!svc.telephone_in_use("0000000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_paged_listing_sorts_and_slices() {
        let svc = service();
        for (first, last) in [("Carlos", "Estaban"), ("Betty", "Davis"), ("George", "Franklin")] {
            svc.create_owner(new_owner(first, last, None)).await.unwrap();
        }

        let params = QueryParams {
            page: 1,
            limit: 2,
            sort: Some("last_name:desc".to_string()),
        };
        let page = svc.list_owners_paged(&params).await.unwrap();

        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].last_name, "Franklin");
        assert_eq!(page.data[1].last_name, "Estaban");
    }
}
