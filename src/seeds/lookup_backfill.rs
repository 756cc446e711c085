//! Placeholder lookups for names the metadata report left out
//!
//! A bundled table lists lookup names together with a few representative
//! values. Names that already have at least one lookup document are skipped;
//! the rest receive one record per value.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use migration::catalog::LOOKUP_COLLECTION;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::error::SeedError;
use crate::models::lookup::{LookupDraft, LookupRecord};
use crate::repositories::CollectionRepository;
use crate::seeds::lookups::to_documents;

const BUNDLED_TABLE: &str = include_str!("../../assets/missing_lookups.json");

/// Lookup name with the values to create for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderLookup {
    pub lookup_name: String,
    pub values: Vec<String>,
}

/// Result of a backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Lookup names that received values, with the values created.
    pub created: BTreeMap<String, Vec<String>>,
    /// Lookup names that already existed.
    pub skipped: Vec<String>,
    /// Documents written (zero on a dry run).
    pub inserted: u64,
}

/// Parses the bundled placeholder table.
pub fn bundled_placeholders() -> Result<Vec<PlaceholderLookup>, SeedError> {
    Ok(serde_json::from_str(BUNDLED_TABLE)?)
}

/// Splits a camel-case value into words: `SquareFeet` becomes `Square Feet`,
/// `HERSIndex` becomes `HERS Index`. Existing spacing is preserved.
pub fn split_camel_case(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

/// Plans the records to create for names absent from `existing_names`.
pub fn plan_backfill(
    placeholders: &[PlaceholderLookup],
    existing_names: &HashSet<String>,
    certification_report_ids: &[String],
) -> (Vec<LookupRecord>, BackfillSummary) {
    let stamp = Utc::now();
    let mut summary = BackfillSummary::default();
    let mut records = Vec::new();

    for placeholder in placeholders {
        let name = &placeholder.lookup_name;
        if existing_names.contains(name) || summary.created.contains_key(name) {
            summary.skipped.push(name.clone());
            continue;
        }

        for value in &placeholder.values {
            let draft = LookupDraft {
                lookup_name: name.clone(),
                lookup_value: value.clone(),
                standard_lookup_value: Some(value.clone()),
                legacy_odata_value: Some(split_camel_case(value)),
            };
            records.extend(draft.into_records(stamp, certification_report_ids));
        }
        summary
            .created
            .insert(name.clone(), placeholder.values.clone());
    }

    (records, summary)
}

/// Adds placeholder lookups for every name that has no lookup documents yet.
pub async fn backfill_missing_lookups(
    db: &DatabaseConnection,
    placeholders: &[PlaceholderLookup],
    certification_report_ids: &[String],
    dry_run: bool,
) -> Result<BackfillSummary, SeedError> {
    let repo = CollectionRepository::new(Arc::new(db.clone()));
    let spec = CollectionRepository::spec(LOOKUP_COLLECTION)?;

    log::info!("Checking lookup collection for existing names");
    let existing_names: HashSet<String> = repo
        .find_documents(spec)
        .await?
        .into_iter()
        .filter_map(|doc| {
            doc.get("LookupName")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .collect();

    let (records, mut summary) =
        plan_backfill(placeholders, &existing_names, certification_report_ids);

    for name in &summary.skipped {
        log::info!("Lookup '{}' already exists, skipping", name);
    }
    log::info!(
        "{} new lookup names to add with {} total lookup values; {} already present",
        summary.created.len(),
        records.len(),
        summary.skipped.len()
    );

    if dry_run || records.is_empty() {
        return Ok(summary);
    }

    summary.inserted = repo.insert_many(spec, to_documents(records)?).await?;
    log::info!("Inserted {} placeholder lookup values", summary.inserted);
    Ok(summary)
}
