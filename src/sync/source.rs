//! Document sources the copier reads from: the remote reference database and
//! the public blob-storage fallback.

use std::time::Duration;

use async_trait::async_trait;
use migration::catalog::CollectionSpec;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::db;
use crate::models::document::Document;
use crate::repositories::CollectionRepository;

/// Recoverable failures while reading from a source.
///
/// None of these abort a run: a remote failure switches the collection to the
/// fallback and a fallback failure yields an empty collection.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("remote read of '{collection}' failed: {message}")]
    Remote { collection: String, message: String },
    #[error("remote read of '{collection}' timed out after {timeout:?}")]
    Timeout {
        collection: String,
        timeout: Duration,
    },
    #[error("fallback request for '{collection}' failed: {source}")]
    Http {
        collection: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fallback for '{collection}' returned status {status}")]
    Status { collection: String, status: u16 },
    #[error("fallback payload for '{collection}' is not a JSON array of documents")]
    Payload { collection: String },
}

/// Something the copier can pull a collection's documents from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short label used in logs and copy outcomes.
    fn name(&self) -> &'static str;

    async fn fetch(&self, spec: &CollectionSpec) -> Result<Vec<Document>, SourceError>;
}

/// Result of trying to open the remote source.
#[derive(Debug)]
pub enum SourceConnection {
    Remote(DatabaseConnection),
    /// Every collection will be read from the fallback.
    Fallback { reason: String },
}

impl SourceConnection {
    pub fn is_remote(&self) -> bool {
        matches!(self, SourceConnection::Remote(_))
    }
}

/// Opens and health-checks the remote source, degrading to the fallback on any failure.
pub async fn connect_source(config: &AppConfig) -> SourceConnection {
    let Some(url) = config.source_database_url.as_deref() else {
        log::info!("No remote source configured, using fallback for all collections");
        return SourceConnection::Fallback {
            reason: "no remote source configured".to_string(),
        };
    };

    let conn = match db::connect(url, config).await {
        Ok(conn) => conn,
        Err(err) => {
            log::warn!("Remote source unavailable, using fallback: {}", err);
            return SourceConnection::Fallback {
                reason: err.to_string(),
            };
        }
    };

    if let Err(err) = db::health_check(&conn).await {
        log::warn!("Remote source failed health check, using fallback: {:#}", err);
        return SourceConnection::Fallback {
            reason: format!("{:#}", err),
        };
    }

    SourceConnection::Remote(conn)
}

/// Reads collections from the remote reference database.
#[derive(Debug, Clone)]
pub struct DatabaseSource {
    repo: CollectionRepository,
    read_timeout: Duration,
}

impl DatabaseSource {
    pub fn new(db: DatabaseConnection, read_timeout: Duration) -> Self {
        Self {
            repo: CollectionRepository::new(Arc::new(db)),
            read_timeout,
        }
    }
}

#[async_trait]
impl DocumentSource for DatabaseSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, spec: &CollectionSpec) -> Result<Vec<Document>, SourceError> {
        match tokio::time::timeout(self.read_timeout, self.repo.find_documents(spec)).await {
            Ok(Ok(documents)) => Ok(documents),
            Ok(Err(err)) => Err(SourceError::Remote {
                collection: spec.name.to_string(),
                message: err.to_string(),
            }),
            Err(_) => Err(SourceError::Timeout {
                collection: spec.name.to_string(),
                timeout: self.read_timeout,
            }),
        }
    }
}

/// Reads collections from `{base_url}/{collection}.json`.
#[derive(Debug, Clone)]
pub struct BlobFallbackSource {
    client: reqwest::Client,
    base_url: String,
}

impl BlobFallbackSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.fallback_base_url.clone(), config.http_timeout())
    }

    pub fn url_for(&self, collection: &str) -> String {
        format!("{}/{}.json", self.base_url, collection)
    }
}

#[async_trait]
impl DocumentSource for BlobFallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn fetch(&self, spec: &CollectionSpec) -> Result<Vec<Document>, SourceError> {
        let url = self.url_for(spec.name);
        log::debug!("Fetching fallback data from {}", url);

        let http_err = |source: reqwest::Error| SourceError::Http {
            collection: spec.name.to_string(),
            source,
        };
        let response = self.client.get(&url).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                collection: spec.name.to_string(),
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await.map_err(http_err)?;
        let Value::Array(items) = payload else {
            return Err(SourceError::Payload {
                collection: spec.name.to_string(),
            });
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(doc) => Ok(doc),
                _ => Err(SourceError::Payload {
                    collection: spec.name.to_string(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_url_joins_base_and_collection() {
        let source =
            BlobFallbackSource::new("https://example.test/files/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.url_for("property"),
            "https://example.test/files/property.json"
        );
    }

    #[tokio::test]
    async fn missing_remote_url_selects_fallback() {
        let config = AppConfig {
            source_database_url: None,
            ..Default::default()
        };
        let conn = connect_source(&config).await;
        assert!(!conn.is_remote());
    }
}
