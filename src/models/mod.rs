//! # Data Models
//!
//! Typed records written by the seeder. Reference collections other than
//! `lookup` are stored as JSON [`document::Document`]s keyed through the
//! collection catalog.

pub mod document;
pub mod lookup;
pub mod metadata_report;
pub mod tenant_config;

pub use document::Document;
pub use lookup::LookupRecord;
pub use metadata_report::MetadataReport;
pub use tenant_config::{Entity as TenantConfig, LookupType};
