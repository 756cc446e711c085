//! Database seeding functionality
//!
//! Tenant profiles, lookup values loaded from a metadata report, and the
//! placeholder backfill for lookup names the report does not cover.

pub mod lookup_backfill;
pub mod lookups;
pub mod tenant_config;

pub use lookup_backfill::{BackfillSummary, backfill_missing_lookups};
pub use lookups::{LoadSummary, load_lookups};
pub use tenant_config::seed_tenant_configs;
