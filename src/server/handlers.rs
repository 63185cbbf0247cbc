//! HTTP request handlers
//!
//! Handlers validate payload shape, delegate to the owner service and
//! translate domain values to wire records. No business logic here.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::CustomersResult;
use crate::core::query::{PaginatedResponse, QueryParams};
use crate::core::service::OwnerService;
use crate::core::store::PetTypeStore;
use crate::server::dto::{OwnerDto, OwnerPayload, PetDto, PetPayload, PetTypeDto};

#[derive(Clone)]
pub struct AppState {
    pub owners: Arc<OwnerService>,
    pub pet_types: Arc<dyn PetTypeStore>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Case-sensitive surname prefix; absent means list everyone.
    pub last_name: Option<String>,
}

pub async fn search_owners(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> CustomersResult<Json<Vec<OwnerDto>>> {
    let owners = state.owners.list_owners(params.last_name.as_deref()).await?;
    Ok(Json(owners.into_iter().map(OwnerDto::from).collect()))
}

pub async fn list_owners_paged(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> CustomersResult<Json<PaginatedResponse<OwnerDto>>> {
    let page = state.owners.list_owners_paged(&params).await?;
    Ok(Json(PaginatedResponse {
        data: page.data.into_iter().map(OwnerDto::from).collect(),
        pagination: page.pagination,
    }))
}

pub async fn get_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> CustomersResult<Json<OwnerDto>> {
    let owner = state.owners.find_owner(&owner_id).await?;
    Ok(Json(OwnerDto::from(owner)))
}

pub async fn create_owner(
    State(state): State<AppState>,
    Json(payload): Json<OwnerPayload>,
) -> CustomersResult<(StatusCode, Json<OwnerDto>)> {
    payload.validate()?;
    for pet in &payload.pets {
        pet.validate()?;
    }
    let owner = state.owners.create_owner(payload.into_new_owner()).await?;
    Ok((StatusCode::CREATED, Json(OwnerDto::from(owner))))
}

pub async fn update_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    Json(payload): Json<OwnerPayload>,
) -> CustomersResult<Json<OwnerDto>> {
    payload.validate()?;
    let owner = state
        .owners
        .update_owner(&owner_id, payload.into_update())
        .await?;
    Ok(Json(OwnerDto::from(owner)))
}

pub async fn delete_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
) -> CustomersResult<StatusCode> {
    state.owners.delete_owner(&owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_pet(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    Json(payload): Json<PetPayload>,
) -> CustomersResult<(StatusCode, Json<PetDto>)> {
    payload.validate()?;
    let pet = state
        .owners
        .add_pet(&owner_id, payload.into_new_pet())
        .await?;
    Ok((StatusCode::CREATED, Json(PetDto::from(pet))))
}

pub async fn list_pet_types(
    State(state): State<AppState>,
) -> CustomersResult<Json<Vec<PetTypeDto>>> {
    let types = state.pet_types.list_pet_types().await?;
    Ok(Json(types.into_iter().map(PetTypeDto::from).collect()))
}
