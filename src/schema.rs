//! Schema initialization for the RESO reference collections.
//!
//! Creation itself is the `migration` crate's job; this module runs it and
//! checks afterwards that every catalog collection and unique index exists.

use migration::catalog::{CollectionSpec, RESO_COLLECTIONS};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::SchemaManager;

/// What is missing for one catalog collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaGap {
    MissingCollection(&'static str),
    MissingUniqueIndex { collection: &'static str, index: String },
}

/// Creates every catalog collection and its unique key index.
///
/// Applies pending migrations; collections and indexes that already exist are
/// left untouched.
pub async fn initialize_schema(
    db: &DatabaseConnection,
) -> Result<&'static [CollectionSpec], DbErr> {
    Migrator::up(db, None).await?;

    for spec in RESO_COLLECTIONS {
        log::info!(
            "Collection '{}' ready with unique key {}",
            spec.name,
            spec.key_field
        );
    }
    log::info!("Schema initialized: {} collections", RESO_COLLECTIONS.len());

    Ok(RESO_COLLECTIONS)
}

/// Lists catalog collections whose table or unique index is absent.
pub async fn verify_schema(db: &DatabaseConnection) -> Result<Vec<SchemaGap>, DbErr> {
    let manager = SchemaManager::new(db);
    let mut gaps = Vec::new();

    for spec in RESO_COLLECTIONS {
        if !manager.has_table(spec.name).await? {
            gaps.push(SchemaGap::MissingCollection(spec.name));
            continue;
        }
        let index = spec.unique_index_name();
        if !manager.has_index(spec.name, &index).await? {
            gaps.push(SchemaGap::MissingUniqueIndex {
                collection: spec.name,
                index,
            });
        }
    }

    Ok(gaps)
}
