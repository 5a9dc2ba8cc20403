//! Document store abstraction layer.
//!
//! This module defines the `DocumentStore` trait which abstracts the external
//! document database behind the two capabilities this service needs: inserting
//! a document into a collection and running a single-field equality query.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::DocumentStoreConfig;

pub mod http;
pub mod memory;

pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;

/// Collection holding user profiles (read-only here, for role queries).
pub const USERS_COLLECTION: &str = "users";
/// Collection this service writes notifications into.
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";
/// Collection holding work submissions.
pub const SUBMISSIONS_COLLECTION: &str = "submissions";
/// Collection holding withdrawal requests.
pub const WITHDRAWALS_COLLECTION: &str = "withdrawals";

/// Create a document store from configuration.
///
/// This is the single point where we convert config into store instances.
/// Adding a new backend requires adding a match arm here.
pub fn create_store(config: &DocumentStoreConfig) -> Arc<dyn DocumentStore> {
    match config {
        DocumentStoreConfig::Http(http_config) => Arc::new(HttpDocumentStore::new(http_config)),
        DocumentStoreConfig::Memory => Arc::new(MemoryDocumentStore::new()),
    }
}

/// Result type for document store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when talking to the document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store API error: {message}")]
    Api { message: String },

    #[error("document store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store returned malformed data: {message}")]
    Decode { message: String },
}

/// A stored document: the id assigned by the store plus the raw field data.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub data: Value,
}

/// Abstract interface over the external document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the id assigned by the store.
    async fn insert(&self, collection: &str, document: &Value) -> Result<String>;

    /// Return every document in `collection` whose `field` equals `value`.
    async fn query_eq(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>>;
}
