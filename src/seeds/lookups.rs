//! Lookup loading from a metadata report
//!
//! Every lookup entry of the report becomes one record (or one per
//! certification report id) in the `lookup` collection, each with a freshly
//! generated key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use migration::catalog::LOOKUP_COLLECTION;
use sea_orm::DatabaseConnection;

use crate::error::SeedError;
use crate::models::lookup::{LookupDraft, LookupRecord};
use crate::models::metadata_report::{
    LEGACY_ODATA_VALUE_TERM, LookupEntry, MetadataReport, STANDARD_NAME_TERM,
};
use crate::repositories::{CollectionRepository, NewDocument};

/// Outcome of a lookup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub report_path: PathBuf,
    /// Lookup entries found in the report.
    pub entries: usize,
    /// Documents written, after fan-out.
    pub inserted: u64,
}

/// Reads and parses a metadata report. Missing or malformed files are fatal.
pub async fn read_metadata_report(path: &Path) -> Result<MetadataReport, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::MetadataRead {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the draft for one report entry.
pub fn draft_from_entry(entry: &LookupEntry) -> LookupDraft {
    LookupDraft {
        lookup_name: entry.short_name().to_string(),
        lookup_value: entry.lookup_value.clone(),
        standard_lookup_value: entry.annotation(STANDARD_NAME_TERM).map(str::to_string),
        legacy_odata_value: entry.annotation(LEGACY_ODATA_VALUE_TERM).map(str::to_string),
    }
}

/// Turns report entries into lookup records, fanned out per certification report id.
pub fn build_lookup_records(
    report: &MetadataReport,
    certification_report_ids: &[String],
) -> Vec<LookupRecord> {
    let stamp = Utc::now();
    report
        .lookups
        .iter()
        .flat_map(|entry| draft_from_entry(entry).into_records(stamp, certification_report_ids))
        .collect()
}

/// Converts records into insertable documents scoped by certification report.
pub fn to_documents(records: Vec<LookupRecord>) -> Result<Vec<NewDocument>, SeedError> {
    records
        .into_iter()
        .map(|record| {
            let scope_id = record.certification_report_id.clone().unwrap_or_default();
            let serde_json::Value::Object(body) = serde_json::to_value(&record)? else {
                return Err(SeedError::Serialization(serde::ser::Error::custom(
                    "lookup record did not serialize to an object",
                )));
            };
            Ok(NewDocument { scope_id, body })
        })
        .collect()
}

/// Loads lookups from the metadata report at `path` into the lookup collection.
pub async fn load_lookups(
    db: &DatabaseConnection,
    path: &Path,
    certification_report_ids: &[String],
) -> Result<LoadSummary, SeedError> {
    log::info!("Inserting lookups from metadata json file {}", path.display());

    let report = read_metadata_report(path).await?;
    let records = build_lookup_records(&report, certification_report_ids);

    let repo = CollectionRepository::new(Arc::new(db.clone()));
    let spec = CollectionRepository::spec(LOOKUP_COLLECTION)?;
    let inserted = repo.insert_many(spec, to_documents(records)?).await?;

    log::info!(
        "Lookups from metadata json file {} inserted successfully ({} entries, {} documents)",
        path.display(),
        report.lookups.len(),
        inserted
    );

    Ok(LoadSummary {
        report_path: path.to_path_buf(),
        entries: report.lookups.len(),
        inserted,
    })
}
