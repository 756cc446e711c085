//! Tenant directory
//!
//! In-memory view of the active tenant profiles, used to pick the metadata
//! report and lookup representation for a tenant id.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::AppConfig;
use crate::models::tenant_config::{self, LookupType};
use crate::repositories::TenantConfigRepository;

/// Tenant id used when none is given or the requested one is unknown.
pub const DEFAULT_TENANT_ID: &str = "default";

/// Active tenant configurations keyed by tenant id.
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    tenants: HashMap<String, tenant_config::Model>,
    default: tenant_config::Model,
}

impl TenantDirectory {
    /// Builds a directory from already-loaded rows; inactive rows are ignored.
    pub fn from_models(models: Vec<tenant_config::Model>, config: &AppConfig) -> Self {
        let mut tenants: HashMap<String, tenant_config::Model> = models
            .into_iter()
            .filter(|m| m.is_active)
            .map(|m| (m.tenant_id.clone(), m))
            .collect();

        let default = match tenants.remove(DEFAULT_TENANT_ID) {
            Some(model) => model,
            None => synthesized_default(config),
        };

        Self { tenants, default }
    }

    /// Loads active tenants from the database.
    ///
    /// A missing table or any read error leaves only the synthesized default.
    pub async fn load(db: &DatabaseConnection, config: &AppConfig) -> Self {
        let repo = TenantConfigRepository::new(Arc::new(db.clone()));
        let models = match repo.list_active().await {
            Ok(models) => models,
            Err(err) => {
                warn!(error = %err, "Failed to load tenant configurations, using default tenant");
                Vec::new()
            }
        };
        if models.is_empty() {
            log::info!("No tenant configurations found, using synthesized default tenant");
        }
        Self::from_models(models, config)
    }

    /// Returns the tenant for `tenant_id`, or the default tenant when the id is
    /// absent, empty, or unknown.
    pub fn resolve(&self, tenant_id: Option<&str>) -> &tenant_config::Model {
        match tenant_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if id == DEFAULT_TENANT_ID => &self.default,
            Some(id) => self.tenants.get(id).unwrap_or_else(|| {
                warn!(tenant_id = id, "Unknown tenant, falling back to default");
                &self.default
            }),
            None => &self.default,
        }
    }

    /// Every known tenant, default first, the rest ordered by tenant id.
    pub fn all(&self) -> Vec<&tenant_config::Model> {
        let mut rest: Vec<_> = self.tenants.values().collect();
        rest.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
        std::iter::once(&self.default).chain(rest).collect()
    }

    pub fn len(&self) -> usize {
        self.tenants.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn synthesized_default(config: &AppConfig) -> tenant_config::Model {
    tenant_config::Model {
        id: 0,
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        metadata_file_path: config.metadata_report_path.display().to_string(),
        lookup_type: config.lookup_type().unwrap_or(LookupType::StringValues),
        friendly_name: "Default".to_string(),
        description: "Default configuration".to_string(),
        is_active: true,
    }
}
