//! Tenant seeding replaces the tenant collection and keeps tenant ids unique.

use anyhow::Result;
use reso_seed::config::AppConfig;
use reso_seed::models::LookupType;
use reso_seed::models::tenant_config;
use reso_seed::repositories::TenantConfigRepository;
use reso_seed::seeds::seed_tenant_configs;
use reso_seed::seeds::tenant_config::default_tenant_count;
use reso_seed::tenants::TenantDirectory;
use sea_orm::Set;
use std::collections::HashSet;
use std::sync::Arc;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::setup_test_db;

#[tokio::test]
async fn seeding_twice_leaves_configured_tenants() -> Result<()> {
    let db = setup_test_db().await?;
    assert_eq!(seed_tenant_configs(&db).await?, default_tenant_count() as u64);
    assert_eq!(seed_tenant_configs(&db).await?, default_tenant_count() as u64);

    let repo = TenantConfigRepository::new(Arc::new(db));
    let tenants = repo.list_all().await?;
    assert_eq!(tenants.len(), 6);

    let ids: HashSet<_> = tenants.iter().map(|t| t.tenant_id.as_str()).collect();
    assert_eq!(ids.len(), tenants.len());
    assert!(ids.contains("default"));
    assert!(ids.contains("dd20-enum"));
    Ok(())
}

#[tokio::test]
async fn seeded_tenants_carry_lookup_types() -> Result<()> {
    let db = setup_test_db().await?;
    seed_tenant_configs(&db).await?;

    let repo = TenantConfigRepository::new(Arc::new(db));
    let flags = repo
        .find_by_tenant_id("dd17-flags")
        .await?
        .expect("dd17-flags seeded");
    assert_eq!(flags.lookup_type, LookupType::EnumFlags);
    assert_eq!(
        flags.metadata_file_path,
        "RESODataDictionary-1.7.metadata-report.json"
    );
    assert_eq!(repo.list_active().await?.len(), 6);
    Ok(())
}

#[tokio::test]
async fn duplicate_tenant_id_is_rejected_after_seeding() -> Result<()> {
    let db = setup_test_db().await?;
    seed_tenant_configs(&db).await?;

    let repo = TenantConfigRepository::new(Arc::new(db));
    let duplicate = tenant_config::ActiveModel {
        tenant_id: Set("default".to_string()),
        metadata_file_path: Set("other.json".to_string()),
        lookup_type: Set(LookupType::StringValues),
        friendly_name: Set("Duplicate".to_string()),
        description: Set(String::new()),
        is_active: Set(true),
        ..Default::default()
    };
    let err = repo.insert_many(vec![duplicate]).await.unwrap_err();
    assert!(reso_seed::error::is_unique_violation(&err));
    assert_eq!(repo.count().await?, 6);
    Ok(())
}

#[tokio::test]
async fn directory_resolves_seeded_tenants() -> Result<()> {
    let db = setup_test_db().await?;
    seed_tenant_configs(&db).await?;

    let dir = TenantDirectory::load(&db, &AppConfig::default()).await;
    assert_eq!(dir.len(), 6);
    assert_eq!(
        dir.resolve(Some("dd20-string")).metadata_file_path,
        "RESODataDictionary-2.0.metadata-report.json"
    );
    assert_eq!(dir.resolve(Some("nope")).tenant_id, "default");
    Ok(())
}

#[tokio::test]
async fn directory_without_tenant_table_uses_default() -> Result<()> {
    let db = setup_test_db().await?;

    let config = AppConfig {
        metadata_report_path: "custom-report.json".into(),
        ..Default::default()
    };
    let dir = TenantDirectory::load(&db, &config).await;
    assert_eq!(dir.len(), 1);
    assert_eq!(dir.resolve(None).metadata_file_path, "custom-report.json");
    Ok(())
}
