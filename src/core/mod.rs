//! Domain core: models, business rules, errors and the owner service.

pub mod error;
pub mod model;
pub mod query;
pub mod rules;
pub mod service;
pub mod store;

pub use error::{CustomersError, CustomersResult, ErrorResponse, FieldError};
pub use model::{NewOwner, NewPet, Owner, OwnerUpdate, Pet, PetType};
pub use query::{PaginatedResponse, PaginationMeta, QueryParams};
pub use service::OwnerService;
pub use store::{OwnerStore, PetTypeStore};
