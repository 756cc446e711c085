//! # Remote/Fallback Copier
//!
//! Copies the RESO reference collections into the local store. Each
//! collection is read from the remote source database when it is reachable,
//! otherwise from the blob fallback; documents are stripped of their source id
//! and optionally fanned out per sandbox server before the bulk insert.

pub mod source;
pub mod transform;

pub use source::{
    BlobFallbackSource, DatabaseSource, DocumentSource, SourceConnection, SourceError,
    connect_source,
};
pub use transform::{FanOut, SANDBOX_SERVER_FIELD, prepare_documents};

use std::sync::Arc;

use migration::catalog::CollectionSpec;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::SeedError;
use crate::models::document::Document;
use crate::repositories::CollectionRepository;

/// Collections copied from the reference source, in processing order.
pub const COPY_ORDER: &[&str] = &[
    "property",
    "media",
    "contact_listing_notes",
    "contact_listings",
    "contacts",
    "history_transactional",
    "internet_tracking",
    "member",
    "office",
    "open_house",
    "other_phone",
    "ouid",
    "property_green_verification",
    "property_power_production",
    "property_rooms",
    "property_unit_types",
    "prospecting",
    "queue",
    "rules",
    "saved_search",
    "showing",
    "social_media",
    "team_members",
    "teams",
];

/// Where a collection's documents ended up coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOrigin {
    Remote,
    Fallback,
}

/// Per-collection result of a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    pub collection: &'static str,
    pub origin: CopyOrigin,
    /// Documents read from the source, before fan-out.
    pub fetched: usize,
    pub inserted: u64,
}

/// Copies collections from a primary source (if any) into the local store,
/// falling back per collection.
pub struct CollectionCopier {
    local: CollectionRepository,
    primary: Option<Box<dyn DocumentSource>>,
    fallback: Box<dyn DocumentSource>,
    fan_out: Option<FanOut>,
}

impl CollectionCopier {
    pub fn new(
        local: Arc<DatabaseConnection>,
        primary: Option<Box<dyn DocumentSource>>,
        fallback: Box<dyn DocumentSource>,
        fan_out: Option<FanOut>,
    ) -> Self {
        Self {
            local: CollectionRepository::new(local),
            primary,
            fallback,
            fan_out,
        }
    }

    /// Wires the copier from configuration and an already-attempted source connection.
    pub fn from_config(
        local: Arc<DatabaseConnection>,
        connection: SourceConnection,
        config: &AppConfig,
    ) -> Result<Self, reqwest::Error> {
        let primary: Option<Box<dyn DocumentSource>> = match connection {
            SourceConnection::Remote(conn) => Some(Box::new(DatabaseSource::new(
                conn,
                config.source_read_timeout(),
            ))),
            SourceConnection::Fallback { reason } => {
                log::info!("Copying from fallback endpoint ({})", reason);
                None
            }
        };
        let fallback = Box::new(BlobFallbackSource::from_config(config)?);
        Ok(Self::new(
            local,
            primary,
            fallback,
            FanOut::sandbox_servers(&config.sandbox_server_ids),
        ))
    }

    async fn fetch(&self, spec: &CollectionSpec) -> (CopyOrigin, Vec<Document>) {
        if let Some(primary) = &self.primary {
            match primary.fetch(spec).await {
                Ok(documents) => return (CopyOrigin::Remote, documents),
                Err(err) => log::warn!("{}; trying {}", err, self.fallback.name()),
            }
        }

        match self.fallback.fetch(spec).await {
            Ok(documents) => (CopyOrigin::Fallback, documents),
            Err(err) => {
                log::warn!("{}; treating '{}' as empty", err, spec.name);
                (CopyOrigin::Fallback, Vec::new())
            }
        }
    }

    /// Copies one collection. Source failures are absorbed; insert failures are fatal.
    pub async fn copy_collection(&self, name: &str) -> Result<CopyOutcome, SeedError> {
        let spec = CollectionRepository::spec(name)?;
        let (origin, documents) = self.fetch(spec).await;
        let fetched = documents.len();

        if documents.is_empty() {
            log::info!("No documents for '{}', skipping", spec.name);
            return Ok(CopyOutcome {
                collection: spec.name,
                origin,
                fetched,
                inserted: 0,
            });
        }

        let prepared = prepare_documents(documents, self.fan_out.as_ref());
        let inserted = self.local.insert_many(spec, prepared).await?;
        log::info!(
            "Copied '{}': {} fetched, {} inserted ({:?})",
            spec.name,
            fetched,
            inserted,
            origin
        );

        Ok(CopyOutcome {
            collection: spec.name,
            origin,
            fetched,
            inserted,
        })
    }

    /// Copies the given collections strictly in order, stopping at the first fatal error.
    pub async fn copy_all(&self, names: &[&str]) -> Result<Vec<CopyOutcome>, SeedError> {
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            outcomes.push(self.copy_collection(name).await?);
        }
        let total: u64 = outcomes.iter().map(|o| o.inserted).sum();
        log::info!(
            "Copy finished: {} collections, {} documents inserted",
            outcomes.len(),
            total
        );
        Ok(outcomes)
    }
}
