//! Per-document preparation applied before copied documents are inserted.

use crate::models::document::{Document, SOURCE_ID_FIELD};
use crate::repositories::NewDocument;

/// Field attached to copied documents when fanning out per sandbox server.
pub const SANDBOX_SERVER_FIELD: &str = "sandboxServerId";

/// Duplicates each document once per target identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOut {
    /// Field the identifier is written to.
    pub field: String,
    pub targets: Vec<String>,
}

impl FanOut {
    /// Returns `None` when there are no targets, i.e. nothing to fan out.
    pub fn new(field: impl Into<String>, targets: Vec<String>) -> Option<Self> {
        if targets.is_empty() {
            return None;
        }
        Some(Self {
            field: field.into(),
            targets,
        })
    }

    /// Fan-out over sandbox server ids.
    pub fn sandbox_servers(targets: &[String]) -> Option<Self> {
        Self::new(SANDBOX_SERVER_FIELD, targets.to_vec())
    }
}

/// Strips the source identifier from every document and applies the fan-out.
///
/// Output order: for each source document, one copy per target in target order.
pub fn prepare_documents(documents: Vec<Document>, fan_out: Option<&FanOut>) -> Vec<NewDocument> {
    let stripped = documents.into_iter().map(|mut doc| {
        doc.remove(SOURCE_ID_FIELD);
        doc
    });

    match fan_out {
        None => stripped.map(NewDocument::unscoped).collect(),
        Some(fan_out) => stripped
            .flat_map(|doc| {
                fan_out.targets.iter().map(move |target| {
                    let mut copy = doc.clone();
                    copy.insert(fan_out.field.clone(), target.clone().into());
                    NewDocument {
                        scope_id: target.clone(),
                        body: copy,
                    }
                })
            })
            .collect(),
    }
}
