//! # Repository Layer
//!
//! Repository implementations encapsulating SeaORM operations: a generic one
//! for catalog collections (tables addressed by name) and an entity-backed one
//! for tenant configurations.

pub mod collection;
pub mod tenant_config;

pub use collection::{CollectionRepository, NewDocument};
pub use tenant_config::TenantConfigRepository;
