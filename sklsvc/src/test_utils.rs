//! Shared helpers for endpoint tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::Value;

use crate::config::{Config, DocumentStoreConfig, ImageHostConfig};
use crate::image_host::ImageHostClient;
use crate::notifications::{FixedRecipientResolver, NotificationService, RecipientResolver};
use crate::store::{Document, DocumentStore, MemoryDocumentStore, StoreError};
use crate::{AppState, build_router};

/// Test configuration pointing the image host at `image_host_base`
/// (usually a wiremock server) and using the in-memory document store.
pub fn create_test_config(image_host_base: &str) -> Config {
    Config {
        image_host: ImageHostConfig {
            base_url: image_host_base.to_string(),
            cloud_name: "testcloud".to_string(),
            upload_preset: "test_preset".to_string(),
            folder: "test_avatars".to_string(),
            timeout_secs: 5,
        },
        document_store: DocumentStoreConfig::Memory,
        ..Config::default()
    }
}

/// Spin up a test server with a fixed admin set and a shared in-memory store.
///
/// The returned store handle lets tests inspect what the handlers persisted.
pub fn create_test_app(image_host_base: &str, admin_ids: Vec<String>) -> (TestServer, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let server = create_test_app_with_store(image_host_base, admin_ids, store.clone());
    (server, store)
}

/// Like [`create_test_app`], but with a caller-supplied store so tests can
/// inject write failures.
pub fn create_test_app_with_store(
    image_host_base: &str,
    admin_ids: Vec<String>,
    store: Arc<dyn DocumentStore>,
) -> TestServer {
    let config = create_test_config(image_host_base);

    let resolver: Arc<dyn RecipientResolver> = Arc::new(FixedRecipientResolver::new(admin_ids));
    let notifier = Arc::new(NotificationService::new(store.clone(), resolver));

    let state = AppState::builder()
        .image_host(ImageHostClient::new(&config.image_host))
        .config(config)
        .store(store)
        .notifier(notifier)
        .build();

    TestServer::new(build_router(state)).expect("Failed to create test server")
}

/// Store wrapper that fails every insert into one collection and delegates
/// everything else to the wrapped in-memory store.
pub struct FailingStore {
    pub inner: Arc<MemoryDocumentStore>,
    pub fail_collection: &'static str,
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, collection: &str, document: &Value) -> crate::store::Result<String> {
        if collection == self.fail_collection {
            return Err(StoreError::Api {
                message: format!("injected write failure on {collection}"),
            });
        }
        self.inner.insert(collection, document).await
    }

    async fn query_eq(&self, collection: &str, field: &str, value: &Value) -> crate::store::Result<Vec<Document>> {
        self.inner.query_eq(collection, field, value).await
    }
}
