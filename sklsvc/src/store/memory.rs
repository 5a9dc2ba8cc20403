//! In-process document store backend.
//!
//! Stand-in for the external document database, useful for development and
//! tests. Documents live in a map keyed by collection name.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{Document, DocumentStore, Result};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection's documents, for test inspection.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .expect("memory store lock poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, document: &Value) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().expect("memory store lock poisoned");
        collections.entry(collection.to_string()).or_default().push(Document {
            id: id.clone(),
            data: document.clone(),
        });
        Ok(id)
    }

    async fn query_eq(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        let collections = self.collections.read().expect("memory store lock poisoned");
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| doc.data.get(field) == Some(value)).cloned().collect())
            .unwrap_or_default())
    }
}
