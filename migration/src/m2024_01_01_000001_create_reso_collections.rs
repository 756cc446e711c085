//! Migration to create the RESO reference collections.
//!
//! Every entry of [`RESO_COLLECTIONS`] becomes a table holding JSON documents,
//! with its natural key extracted into a dedicated column and guarded by a
//! unique index together with the fan-out scope.

use sea_orm_migration::prelude::*;

use crate::catalog::{
    CollectionSpec, CREATED_AT_COLUMN, DOCUMENT_COLUMN, ID_COLUMN, RESO_COLLECTIONS, SCOPE_COLUMN,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for spec in RESO_COLLECTIONS {
            create_collection(manager, spec).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for spec in RESO_COLLECTIONS.iter().rev() {
            manager
                .drop_table(
                    Table::drop()
                        .table(Alias::new(spec.name))
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

async fn create_collection(manager: &SchemaManager<'_>, spec: &CollectionSpec) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Alias::new(spec.name))
                .if_not_exists()
                .col(
                    ColumnDef::new(Alias::new(ID_COLUMN))
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Alias::new(spec.key_field)).text().null())
                .col(
                    ColumnDef::new(Alias::new(SCOPE_COLUMN))
                        .text()
                        .not_null()
                        .default(""),
                )
                .col(
                    ColumnDef::new(Alias::new(DOCUMENT_COLUMN))
                        .json_binary()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Alias::new(CREATED_AT_COLUMN))
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .to_owned(),
        )
        .await?;

    // Key plus scope: plain duplicates collide, fan-out copies do not.
    manager
        .create_index(
            Index::create()
                .name(spec.unique_index_name())
                .table(Alias::new(spec.name))
                .col(Alias::new(spec.key_field))
                .col(Alias::new(SCOPE_COLUMN))
                .unique()
                .if_not_exists()
                .to_owned(),
        )
        .await
}
