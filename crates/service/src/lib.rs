//! Service layer for the mind map resources.
//! - `store` persists rows (PostgreSQL through SeaORM, or in memory).
//! - `resource_service` owns referential checks and not-found mapping.
//! - `domain` holds the request/response shapes shared with the HTTP layer.

pub mod errors;
pub mod domain;
pub mod store;
pub mod resource_service;
pub mod password;
#[cfg(test)]
pub mod test_support;

pub use resource_service::ResourceService;
pub use store::{ResourceStore, memory::InMemoryResourceStore, seaorm::SeaOrmResourceStore};
