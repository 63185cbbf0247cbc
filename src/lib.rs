//! # PetClinic Customers Service
//!
//! A customer-management microservice for a veterinary clinic: owners,
//! their pets, and the catalog of pet types, exposed over a REST API.
//!
//! ## Features
//!
//! - **Owner CRUD**: Create, read, update and delete pet owners
//! - **Pet Registration**: Attach pets to owners, with a pet type catalog
//! - **Business Rules**: Telephone uniqueness, per-owner pet cap,
//!   duplicate-name and future-birth-date checks in a fixed order
//! - **Surname Search**: Case-sensitive prefix lookup plus paginated listing
//! - **Pluggable Storage**: Store traits with an in-memory backend
//! - **Sample Data**: Optional well-known data set loaded at startup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use petclinic_customers::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let owners = Arc::new(OwnerService::new(store.clone(), store.clone()));
//!
//! let app = build_router(AppState {
//!     owners,
//!     pet_types: store,
//! });
//! serve(app, "127.0.0.1:8081").await?;
//! ```

pub mod config;
pub mod core;
pub mod seed;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        error::{CustomersError, CustomersResult, ErrorResponse, FieldError},
        model::{NewOwner, NewPet, Owner, OwnerUpdate, Pet, PetType},
        query::{PaginatedResponse, PaginationMeta, QueryParams},
        rules::MAX_PETS_PER_OWNER,
        service::OwnerService,
        store::{OwnerStore, PetTypeStore},
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::ServiceConfig;

    // === Server ===
    pub use crate::server::{AppState, build_router, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
