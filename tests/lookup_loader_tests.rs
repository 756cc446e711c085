//! Lookup loading from metadata report files.

use anyhow::Result;
use migration::catalog::LOOKUP_COLLECTION;
use reso_seed::error::SeedError;
use reso_seed::repositories::CollectionRepository;
use reso_seed::seeds::load_lookups;
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;
use tempfile::TempDir;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::setup_test_db;

fn write_report(dir: &TempDir) -> PathBuf {
    let report = json!({
        "description": "RESO Data Dictionary Metadata Report",
        "lookups": [
            {
                "lookupName": "org.reso.metadata.enums.StandardStatus",
                "lookupValue": "Active",
                "type": "Edm.Int32",
                "annotations": [
                    { "term": "RESO.OData.Metadata.StandardName", "value": "Active" },
                    { "term": "RESO.OData.Metadata.LegacyODataValue", "value": "Active" }
                ]
            },
            {
                "lookupName": "org.reso.metadata.enums.StandardStatus",
                "lookupValue": "ActiveUnderContract",
                "annotations": [
                    { "term": "RESO.OData.Metadata.StandardName", "value": "Active Under Contract" }
                ]
            },
            {
                "lookupName": "org.reso.metadata.enums.AreaSource",
                "lookupValue": "Appraiser"
            }
        ]
    });
    let path = dir.path().join("metadata-report.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&report).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn loads_one_document_per_entry_with_fresh_keys() -> Result<()> {
    let db = setup_test_db().await?;
    let dir = TempDir::new()?;
    let path = write_report(&dir);

    let summary = load_lookups(&db, &path, &[]).await?;
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.inserted, 3);

    let repo = CollectionRepository::new(std::sync::Arc::new(db));
    let docs = repo
        .find_documents(CollectionRepository::spec(LOOKUP_COLLECTION)?)
        .await?;
    assert_eq!(docs.len(), 3);

    let keys: HashSet<_> = docs.iter().map(|d| d["LookupKey"].as_str().unwrap()).collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| k.len() == 32 && k.chars().all(|c| c.is_ascii_hexdigit())));

    let names: Vec<_> = docs.iter().map(|d| d["LookupName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["StandardStatus", "StandardStatus", "AreaSource"]);

    assert_eq!(docs[1]["StandardLookupValue"], "Active Under Contract");
    assert!(docs[1]["LegacyODataValue"].is_null());
    assert!(docs[2]["StandardLookupValue"].is_null());
    assert!(docs.iter().all(|d| d.contains_key("ModificationTimestamp")));
    assert!(docs.iter().all(|d| !d.contains_key("certificationReportId")));
    Ok(())
}

#[tokio::test]
async fn fans_out_per_certification_report() -> Result<()> {
    let db = setup_test_db().await?;
    let dir = TempDir::new()?;
    let path = write_report(&dir);
    let ids = vec!["cert-1".to_string(), "cert-2".to_string()];

    let summary = load_lookups(&db, &path, &ids).await?;
    assert_eq!(summary.inserted, 6);

    let repo = CollectionRepository::new(std::sync::Arc::new(db));
    let stored = repo
        .find_all(CollectionRepository::spec(LOOKUP_COLLECTION)?)
        .await?;
    assert_eq!(stored.len(), 6);

    let keys: HashSet<_> = stored.iter().filter_map(|d| d.key.as_deref()).collect();
    assert_eq!(keys.len(), 6);
    for doc in &stored {
        assert_eq!(doc.body["certificationReportId"], doc.scope_id.as_str());
    }
    let per_cert = stored.iter().filter(|d| d.scope_id == "cert-2").count();
    assert_eq!(per_cert, 3);
    Ok(())
}

#[tokio::test]
async fn missing_report_is_fatal() -> Result<()> {
    let db = setup_test_db().await?;
    let dir = TempDir::new()?;

    let err = load_lookups(&db, &dir.path().join("absent.json"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::MetadataRead { .. }));
    Ok(())
}

#[tokio::test]
async fn malformed_report_is_fatal() -> Result<()> {
    let db = setup_test_db().await?;
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"lookups\": [ {\"lookupName\": ")?;

    let err = load_lookups(&db, &path, &[]).await.unwrap_err();
    assert!(matches!(err, SeedError::MetadataParse { .. }));

    let repo = CollectionRepository::new(std::sync::Arc::new(db));
    assert_eq!(
        repo.count(CollectionRepository::spec(LOOKUP_COLLECTION)?)
            .await?,
        0
    );
    Ok(())
}
