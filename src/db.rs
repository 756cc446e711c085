//! Database connection management for the seeder.
//!
//! Both the local store and the optional remote source are opened through
//! SeaORM with the same pool settings; the remote one is only ever read.

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::time::Duration;

use crate::config::{AppConfig, redact_url};

/// Errors that can occur during database setup.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: sea_orm::DbErr,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

fn connect_options(url: &str, cfg: &AppConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .connect_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    opt
}

/// Opens a pool to `url` with the configured limits. Single attempt, no retries.
pub async fn connect(url: &str, cfg: &AppConfig) -> Result<DatabaseConnection, DatabaseError> {
    if url.trim().is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        });
    }

    let redacted = redact_url(url);
    match Database::connect(connect_options(url, cfg)).await {
        Ok(conn) => {
            log::info!("Connected to database {}", redacted);
            Ok(conn)
        }
        Err(source) => Err(DatabaseError::ConnectionFailed {
            url: redacted,
            source,
        }),
    }
}

/// Opens the local (destination) database.
///
/// # Examples
///
/// ```no_run
/// use reso_seed::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::default();
///     let db = init_pool(&config).await?;
///     // Use the database connection...
///     Ok(())
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    let conn = connect(&cfg.database_url, cfg).await?;
    Ok(conn)
}

/// Liveness check: runs a trivial query against the connection.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());

    db.query_one(stmt)
        .await
        .context("Database health check failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_database_url() {
        let config = AppConfig {
            database_url: "".to_string(),
            ..Default::default()
        };

        let result = init_pool(&config).await;

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn in_memory_sqlite_passes_health_check() {
        let config = AppConfig::default();
        let db = connect("sqlite::memory:", &config).await.unwrap();
        health_check(&db).await.unwrap();
    }
}
