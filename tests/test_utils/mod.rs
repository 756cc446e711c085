//! Test utilities for database testing.
//!
//! In-memory SQLite databases with the catalog migration applied, plus helpers
//! for building documents.

#![allow(dead_code)]

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use reso_seed::models::Document;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use std::sync::Arc;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Sets up an in-memory SQLite database with all migrations applied and returns an Arc.
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// An in-memory SQLite database with no tables at all.
pub async fn setup_empty_db() -> Result<DatabaseConnection> {
    Ok(Database::connect("sqlite::memory:").await?)
}

/// Converts a `json!` object literal into a document.
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
