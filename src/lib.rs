//! # RESO Seed Library
//!
//! Initialization routines for a RESO reference dataset: collection schema,
//! tenant profiles, reference data copied from a remote source or blob
//! fallback, and lookup values loaded from a metadata report.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod seeds;
pub mod sync;
pub mod telemetry;
pub mod tenants;
pub use migration;
