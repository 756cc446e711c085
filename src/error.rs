//! # Error Handling
//!
//! Fatal seeding errors. Recoverable source-side failures live in
//! [`crate::sync::SourceError`] instead; anything surfacing as [`SeedError`]
//! aborts the running command.

use std::path::PathBuf;

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// Errors raised while writing seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("duplicate {key_field} in collection '{collection}': {source}")]
    DuplicateKey {
        collection: String,
        key_field: String,
        source: DbErr,
    },
    #[error("collection '{0}' is not part of the RESO catalog")]
    UnknownCollection(String),
    #[error("failed to read metadata report {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse metadata report {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to build statement: {0}")]
    Statement(#[from] sea_orm::sea_query::error::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeedError {
    /// Wraps a database error, promoting uniqueness violations to [`SeedError::DuplicateKey`].
    pub fn from_insert(collection: &str, key_field: &str, error: DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, collection, "Unique constraint violation detected");
            return SeedError::DuplicateKey {
                collection: collection.to_string(),
                key_field: key_field.to_string(),
                source: error,
            };
        }
        SeedError::Database(error)
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, SeedError::DuplicateKey { .. })
    }
}

/// Returns true when the database rejected a write because of a unique index.
pub fn is_unique_violation(error: &DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    if matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    let runtime_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    match db_error.code() {
        Some(code) => {
            let code: &str = &code;
            code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code)
        }
        None => false,
    }
}
