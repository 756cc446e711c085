//! Collection repository for catalog-driven document tables
//!
//! Catalog collections share one table layout (key column, scope, JSON
//! document), so statements are built with sea-query against the table name
//! instead of per-collection entities.

use std::sync::Arc;

use migration::catalog::{
    CollectionSpec, DOCUMENT_COLUMN, ID_COLUMN, SCOPE_COLUMN, find_collection,
};
use sea_orm::sea_query::{Alias, Asterisk, Expr, Order, Query, SimpleExpr};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::Value;

use crate::error::SeedError;
use crate::models::document::{Document, key_value};

/// Rows per multi-row INSERT; keeps bind parameters under SQLite's limit.
const INSERT_CHUNK_SIZE: usize = 500;

/// A document ready for insertion, with the fan-out scope it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    /// Sandbox server or certification report id; empty when not fanned out.
    pub scope_id: String,
    pub body: Document,
}

impl NewDocument {
    pub fn unscoped(body: Document) -> Self {
        Self {
            scope_id: String::new(),
            body,
        }
    }
}

/// A document read back from a collection table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// `None` when the document had no key field.
    pub key: Option<String>,
    pub scope_id: String,
    pub body: Document,
}

/// Repository for catalog collection tables
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl CollectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolves a collection name against the catalog.
    pub fn spec(name: &str) -> Result<&'static CollectionSpec, SeedError> {
        find_collection(name).ok_or_else(|| SeedError::UnknownCollection(name.to_string()))
    }

    /// Inserts documents into the collection, returning how many were written.
    ///
    /// Documents without the key field are stored with a NULL key. A
    /// uniqueness violation surfaces as [`SeedError::DuplicateKey`] and stops
    /// the batch.
    pub async fn insert_many(
        &self,
        spec: &CollectionSpec,
        documents: Vec<NewDocument>,
    ) -> Result<u64, SeedError> {
        let mut rows = Vec::with_capacity(documents.len());
        for doc in documents {
            let key = key_value(&doc.body, spec.key_field);
            let row: Vec<SimpleExpr> = vec![
                key.into(),
                doc.scope_id.into(),
                Value::Object(doc.body).into(),
            ];
            rows.push(row);
        }

        let backend = self.db.get_database_backend();
        let mut inserted = 0u64;
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            let mut stmt = Query::insert();
            stmt.into_table(Alias::new(spec.name)).columns([
                Alias::new(spec.key_field),
                Alias::new(SCOPE_COLUMN),
                Alias::new(DOCUMENT_COLUMN),
            ]);
            for row in rows.by_ref().take(INSERT_CHUNK_SIZE) {
                stmt.values(row)?;
            }

            let result = self
                .db
                .execute(backend.build(&stmt))
                .await
                .map_err(|e| SeedError::from_insert(spec.name, spec.key_field, e))?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Reads every document of a collection in insertion order.
    pub async fn find_all(&self, spec: &CollectionSpec) -> Result<Vec<StoredDocument>, SeedError> {
        let stmt = Query::select()
            .columns([
                Alias::new(spec.key_field),
                Alias::new(SCOPE_COLUMN),
                Alias::new(DOCUMENT_COLUMN),
            ])
            .from(Alias::new(spec.name))
            .order_by(Alias::new(ID_COLUMN), Order::Asc)
            .to_owned();

        let backend = self.db.get_database_backend();
        let rows = self.db.query_all(backend.build(&stmt)).await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let key: Option<String> = row.try_get("", spec.key_field)?;
            let scope_id: String = row.try_get("", SCOPE_COLUMN)?;
            let body = match row.try_get::<Value>("", DOCUMENT_COLUMN)? {
                Value::Object(map) => map,
                other => {
                    let mut map = Document::new();
                    map.insert("value".to_string(), other);
                    map
                }
            };
            documents.push(StoredDocument {
                key,
                scope_id,
                body,
            });
        }
        Ok(documents)
    }

    /// Reads only the JSON bodies of a collection.
    pub async fn find_documents(&self, spec: &CollectionSpec) -> Result<Vec<Document>, SeedError> {
        Ok(self
            .find_all(spec)
            .await?
            .into_iter()
            .map(|doc| doc.body)
            .collect())
    }

    /// Counts the documents in a collection.
    pub async fn count(&self, spec: &CollectionSpec) -> Result<u64, SeedError> {
        let stmt = Query::select()
            .expr_as(Expr::col(Asterisk).count(), Alias::new("count"))
            .from(Alias::new(spec.name))
            .to_owned();

        let backend = self.db.get_database_backend();
        let count = match self.db.query_one(backend.build(&stmt)).await? {
            Some(row) => row.try_get::<i64>("", "count")?,
            None => 0,
        };
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
