//! Metadata report (RESO certification report) input format.
//!
//! Only the `lookups` section is read; everything else in the report is
//! ignored.

use serde::Deserialize;

pub const STANDARD_NAME_TERM: &str = "RESO.OData.Metadata.StandardName";
pub const LEGACY_ODATA_VALUE_TERM: &str = "RESO.OData.Metadata.LegacyODataValue";

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataReport {
    pub lookups: Vec<LookupEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntry {
    /// Dot-qualified name, e.g. `org.reso.metadata.enums.StandardStatus`.
    pub lookup_name: String,
    pub lookup_value: String,
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Annotation {
    pub term: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl LookupEntry {
    /// Last dot-delimited segment of the qualified name.
    pub fn short_name(&self) -> &str {
        self.lookup_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.lookup_name)
    }

    /// Value of the first annotation with the given term.
    pub fn annotation(&self, term: &str) -> Option<&str> {
        self.annotations
            .as_deref()?
            .iter()
            .find(|a| a.term == term)
            .and_then(|a| a.value.as_deref())
    }
}
