//! Database migrations for the RESO reference seeder.
//!
//! The collection catalog lives here so that both the migration and the
//! seeding library agree on table names and key fields.

pub use sea_orm_migration::prelude::*;

pub mod catalog;

mod m2024_01_01_000001_create_reso_collections;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m2024_01_01_000001_create_reso_collections::Migration,
        )]
    }
}
