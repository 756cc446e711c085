//! Placeholder backfill for lookup names without values.

use anyhow::Result;
use migration::catalog::LOOKUP_COLLECTION;
use reso_seed::repositories::{CollectionRepository, NewDocument};
use reso_seed::seeds::backfill_missing_lookups;
use reso_seed::seeds::lookup_backfill::{PlaceholderLookup, bundled_placeholders};
use serde_json::json;
use std::sync::Arc;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{doc, setup_test_db};

fn placeholders() -> Vec<PlaceholderLookup> {
    vec![
        PlaceholderLookup {
            lookup_name: "StandardStatus".into(),
            values: vec!["Active".into(), "Pending".into()],
        },
        PlaceholderLookup {
            lookup_name: "WaterSource".into(),
            values: vec!["PublicUtility".into(), "Well".into()],
        },
    ]
}

async fn seed_existing_name(db: &sea_orm::DatabaseConnection) -> Result<()> {
    let repo = CollectionRepository::new(Arc::new(db.clone()));
    repo.insert_many(
        CollectionRepository::spec(LOOKUP_COLLECTION)?,
        vec![NewDocument::unscoped(doc(json!({
            "LookupKey": "existing-key",
            "LookupName": "StandardStatus",
            "LookupValue": "Active"
        })))],
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn backfill_skips_existing_names() -> Result<()> {
    let db = setup_test_db().await?;
    seed_existing_name(&db).await?;

    let summary = backfill_missing_lookups(&db, &placeholders(), &[], false).await?;

    assert_eq!(summary.skipped, vec!["StandardStatus".to_string()]);
    assert_eq!(summary.created.len(), 1);
    assert_eq!(summary.inserted, 2);

    let docs = CollectionRepository::new(Arc::new(db))
        .find_documents(CollectionRepository::spec(LOOKUP_COLLECTION)?)
        .await?;
    let water: Vec<_> = docs
        .iter()
        .filter(|d| d["LookupName"] == "WaterSource")
        .collect();
    assert_eq!(water.len(), 2);
    assert_eq!(water[0]["LegacyODataValue"], "Public Utility");
    assert_eq!(water[0]["StandardLookupValue"], "PublicUtility");
    Ok(())
}

#[tokio::test]
async fn second_backfill_inserts_nothing() -> Result<()> {
    let db = setup_test_db().await?;

    let first = backfill_missing_lookups(&db, &placeholders(), &[], false).await?;
    assert_eq!(first.inserted, 4);

    let second = backfill_missing_lookups(&db, &placeholders(), &[], false).await?;
    assert_eq!(second.inserted, 0);
    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), 2);
    Ok(())
}

#[tokio::test]
async fn dry_run_reports_plan_without_writing() -> Result<()> {
    let db = setup_test_db().await?;

    let summary = backfill_missing_lookups(&db, &placeholders(), &[], true).await?;
    assert_eq!(summary.created.len(), 2);
    assert_eq!(summary.inserted, 0);

    let count = CollectionRepository::new(Arc::new(db))
        .count(CollectionRepository::spec(LOOKUP_COLLECTION)?)
        .await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn backfill_fans_out_per_certification_report() -> Result<()> {
    let db = setup_test_db().await?;
    let ids = vec!["c1".to_string(), "c2".to_string(), "c3".to_string()];

    let summary = backfill_missing_lookups(&db, &placeholders(), &ids, false).await?;
    assert_eq!(summary.inserted, 12);
    Ok(())
}

#[tokio::test]
async fn bundled_table_backfills_an_empty_collection() -> Result<()> {
    let db = setup_test_db().await?;
    let table = bundled_placeholders()?;
    let expected: usize = table.iter().map(|p| p.values.len()).sum();

    let summary = backfill_missing_lookups(&db, &table, &[], false).await?;
    assert_eq!(summary.inserted as usize, expected);
    Ok(())
}
