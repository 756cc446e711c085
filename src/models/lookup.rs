//! Lookup (controlled vocabulary) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field carrying the certification report a fanned-out lookup belongs to.
pub const CERTIFICATION_REPORT_FIELD: &str = "certificationReportId";

/// One value of a RESO lookup, as stored in the `lookup` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LookupRecord {
    pub lookup_key: String,
    /// Short lookup name, e.g. `StandardStatus`.
    pub lookup_name: String,
    pub lookup_value: String,
    pub standard_lookup_value: Option<String>,
    #[serde(rename = "LegacyODataValue")]
    pub legacy_odata_value: Option<String>,
    pub modification_timestamp: DateTime<Utc>,
    #[serde(
        rename = "certificationReportId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certification_report_id: Option<String>,
}

/// Generates a lookup key: a v4 UUID rendered as 32 lowercase hex characters.
pub fn generate_lookup_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Field values shared by every copy of a lookup, before keys are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupDraft {
    pub lookup_name: String,
    pub lookup_value: String,
    pub standard_lookup_value: Option<String>,
    pub legacy_odata_value: Option<String>,
}

impl LookupDraft {
    fn record(&self, stamp: DateTime<Utc>, certification_report_id: Option<String>) -> LookupRecord {
        LookupRecord {
            lookup_key: generate_lookup_key(),
            lookup_name: self.lookup_name.clone(),
            lookup_value: self.lookup_value.clone(),
            standard_lookup_value: self.standard_lookup_value.clone(),
            legacy_odata_value: self.legacy_odata_value.clone(),
            modification_timestamp: stamp,
            certification_report_id,
        }
    }

    /// Materializes the draft: one record, or one per certification report id.
    /// Every record gets its own freshly generated key.
    pub fn into_records(
        self,
        stamp: DateTime<Utc>,
        certification_report_ids: &[String],
    ) -> Vec<LookupRecord> {
        if certification_report_ids.is_empty() {
            return vec![self.record(stamp, None)];
        }
        certification_report_ids
            .iter()
            .map(|id| self.record(stamp, Some(id.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draft() -> LookupDraft {
        LookupDraft {
            lookup_name: "StandardStatus".into(),
            lookup_value: "Active".into(),
            standard_lookup_value: Some("Active".into()),
            legacy_odata_value: None,
        }
    }

    #[test]
    fn generated_keys_are_32_hex_chars() {
        let key = generate_lookup_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!key.contains('-'));
    }

    #[test]
    fn fan_out_assigns_distinct_keys() {
        let ids = vec!["r1".to_string(), "r2".to_string(), "r3".to_string()];
        let records = draft().into_records(Utc::now(), &ids);
        assert_eq!(records.len(), 3);
        let keys: HashSet<_> = records.iter().map(|r| r.lookup_key.as_str()).collect();
        assert_eq!(keys.len(), 3);
        let tagged: Vec<_> = records
            .iter()
            .map(|r| r.certification_report_id.clone().unwrap())
            .collect();
        assert_eq!(tagged, ids);
    }

    #[test]
    fn serializes_with_reso_field_names() {
        let record = draft().into_records(Utc::now(), &[]).remove(0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["LookupName"], "StandardStatus");
        assert_eq!(json["StandardLookupValue"], "Active");
        assert!(json["LegacyODataValue"].is_null());
        assert!(json.get("certificationReportId").is_none());
        assert!(json["LookupKey"].is_string());
    }
}
