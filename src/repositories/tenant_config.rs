//! # Tenant Configuration Repository
//!
//! Read and bulk-insert operations over the `tenant_configs` table.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::models::tenant_config::{self, Entity as TenantConfig};

/// Repository for tenant configuration rows
#[derive(Debug, Clone)]
pub struct TenantConfigRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl TenantConfigRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts all rows in a single statement; any failure rejects the batch.
    pub async fn insert_many(
        &self,
        configs: Vec<tenant_config::ActiveModel>,
    ) -> Result<(), DbErr> {
        if configs.is_empty() {
            return Ok(());
        }
        TenantConfig::insert_many(configs).exec(&*self.db).await?;
        Ok(())
    }

    /// Finds a tenant configuration by its tenant id
    pub async fn find_by_tenant_id(
        &self,
        tenant_id: &str,
    ) -> Result<Option<tenant_config::Model>, DbErr> {
        TenantConfig::find()
            .filter(tenant_config::Column::TenantId.eq(tenant_id))
            .one(&*self.db)
            .await
    }

    /// Lists active tenant configurations ordered by tenant id
    pub async fn list_active(&self) -> Result<Vec<tenant_config::Model>, DbErr> {
        TenantConfig::find()
            .filter(tenant_config::Column::IsActive.eq(true))
            .order_by_asc(tenant_config::Column::TenantId)
            .all(&*self.db)
            .await
    }

    /// Lists every tenant configuration ordered by tenant id
    pub async fn list_all(&self) -> Result<Vec<tenant_config::Model>, DbErr> {
        TenantConfig::find()
            .order_by_asc(tenant_config::Column::TenantId)
            .all(&*self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        TenantConfig::find().count(&*self.db).await
    }
}
