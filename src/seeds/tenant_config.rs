//! Tenant configuration seeding
//!
//! Replaces the `tenant_configs` table with the built-in tenant profiles:
//! drop if present, recreate, insert all, then add the unique tenant id index.

use anyhow::{Context, Result};
use sea_orm::sea_query::{Index, Table};
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema, Set};
use sea_orm_migration::SchemaManager;
use std::sync::Arc;

use crate::models::tenant_config::{self, Entity as TenantConfig, LookupType};
use crate::repositories::TenantConfigRepository;

const TENANT_ID_INDEX: &str = "idx_tenant_configs_tenant_id";
const DD17_REPORT: &str = "RESODataDictionary-1.7.metadata-report.json";
const DD20_REPORT: &str = "RESODataDictionary-2.0.metadata-report.json";

/// Seeds the tenant configuration table, returning the number of tenants created.
pub async fn seed_tenant_configs(db: &DatabaseConnection) -> Result<u64> {
    log::info!("Starting tenant configuration initialization");
    let manager = SchemaManager::new(db);

    if manager
        .has_table("tenant_configs")
        .await
        .context("checking for tenant_configs")?
    {
        log::info!("Found existing tenant_configs collection, dropping it for clean init");
        manager
            .drop_table(Table::drop().table(TenantConfig).to_owned())
            .await
            .context("dropping tenant_configs")?;
    }

    let schema = Schema::new(db.get_database_backend());
    manager
        .create_table(schema.create_table_from_entity(TenantConfig))
        .await
        .context("creating tenant_configs")?;

    let repo = TenantConfigRepository::new(Arc::new(db.clone()));
    let rows = default_tenants()
        .into_iter()
        .map(TenantSeed::into_active_model)
        .collect();
    repo.insert_many(rows)
        .await
        .context("inserting tenant configurations")?;

    manager
        .create_index(
            Index::create()
                .name(TENANT_ID_INDEX)
                .table(TenantConfig)
                .col(tenant_config::Column::TenantId)
                .unique()
                .to_owned(),
        )
        .await
        .context("creating tenant id index")?;

    let count = repo.count().await.context("counting tenant configurations")?;
    log::info!("Created {} tenant configurations", count);
    Ok(count)
}

/// Built-in tenant profile
struct TenantSeed {
    tenant_id: &'static str,
    metadata_file_path: &'static str,
    lookup_type: LookupType,
    friendly_name: &'static str,
    description: &'static str,
}

impl TenantSeed {
    fn into_active_model(self) -> tenant_config::ActiveModel {
        tenant_config::ActiveModel {
            tenant_id: Set(self.tenant_id.to_string()),
            metadata_file_path: Set(self.metadata_file_path.to_string()),
            lookup_type: Set(self.lookup_type),
            friendly_name: Set(self.friendly_name.to_string()),
            description: Set(self.description.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
    }
}

fn default_tenants() -> Vec<TenantSeed> {
    vec![
        TenantSeed {
            tenant_id: "default",
            metadata_file_path: DD17_REPORT,
            lookup_type: LookupType::StringValues,
            friendly_name: "Default Configuration",
            description: "Default configuration using RESO Data Dictionary 1.7 with STRING lookup type",
        },
        TenantSeed {
            tenant_id: "dd17-string",
            metadata_file_path: DD17_REPORT,
            lookup_type: LookupType::StringValues,
            friendly_name: "DD 1.7 with String Lookups",
            description: "RESO Data Dictionary 1.7 configuration with STRING lookup type",
        },
        TenantSeed {
            tenant_id: "dd17-enum",
            metadata_file_path: DD17_REPORT,
            lookup_type: LookupType::EnumCollection,
            friendly_name: "DD 1.7 with Enum Collection",
            description: "RESO Data Dictionary 1.7 configuration with ENUM_COLLECTION lookup type",
        },
        TenantSeed {
            tenant_id: "dd17-flags",
            metadata_file_path: DD17_REPORT,
            lookup_type: LookupType::EnumFlags,
            friendly_name: "DD 1.7 with Enum Flags",
            description: "RESO Data Dictionary 1.7 configuration with ENUM_FLAGS lookup type",
        },
        TenantSeed {
            tenant_id: "dd20-string",
            metadata_file_path: DD20_REPORT,
            lookup_type: LookupType::StringValues,
            friendly_name: "DD 2.0 with String Lookups",
            description: "RESO Data Dictionary 2.0 configuration with STRING lookup type",
        },
        TenantSeed {
            tenant_id: "dd20-enum",
            metadata_file_path: DD20_REPORT,
            lookup_type: LookupType::EnumCollection,
            friendly_name: "DD 2.0 with Enum Collection",
            description: "RESO Data Dictionary 2.0 configuration with ENUM_COLLECTION lookup type",
        },
    ]
}

/// Number of built-in tenant profiles.
pub fn default_tenant_count() -> usize {
    default_tenants().len()
}
