//! HTTP document store backend.
//!
//! Speaks a generic JSON document API: `POST /{collection}` inserts a document
//! and returns `{"id": ...}`; `GET /{collection}?field=...&equals=...` runs a
//! single-field equality query and returns `{"documents": [...]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::HttpStoreConfig;
use crate::store::{Document, DocumentStore, Result, StoreError};

pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<Document>,
}

impl HttpDocumentStore {
    pub fn new(config: &HttpStoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create document store HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn insert(&self, collection: &str, document: &Value) -> Result<String> {
        let response = self
            .authorize(self.client.post(self.collection_url(collection)))
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                message: format!("insert into {collection} failed with HTTP {status}: {body}"),
            });
        }

        let created: InsertResponse = response.json().await.map_err(|e| StoreError::Decode {
            message: format!("insert response: {e}"),
        })?;

        Ok(created.id)
    }

    async fn query_eq(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        // Strings are sent bare; everything else in its JSON rendering.
        let equals = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let response = self
            .authorize(self.client.get(self.collection_url(collection)))
            .query(&[("field", field), ("equals", equals.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                message: format!("query on {collection}.{field} failed with HTTP {status}: {body}"),
            });
        }

        let found: QueryResponse = response.json().await.map_err(|e| StoreError::Decode {
            message: format!("query response: {e}"),
        })?;

        Ok(found.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer, api_key: Option<&str>) -> HttpDocumentStore {
        HttpDocumentStore::new(&HttpStoreConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn insert_returns_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "doc-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let id = store.insert("notifications", &json!({"title": "hi"})).await.unwrap();

        assert_eq!(id, "doc-1");
    }

    #[tokio::test]
    async fn insert_sends_bearer_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notifications"))
            .and(header("authorization", "Bearer sekrit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "doc-2"})))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, Some("sekrit"));
        store.insert("notifications", &json!({})).await.unwrap();
    }

    #[tokio::test]
    async fn insert_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let err = store.insert("notifications", &json!({})).await.unwrap_err();

        assert!(matches!(err, StoreError::Api { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn query_eq_parses_documents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("field", "role"))
            .and(query_param("equals", "admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {"id": "u1", "role": "admin", "name": "Root"},
                    {"id": "u2", "role": "admin"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, None);
        let docs = store.query_eq("users", "role", &json!("admin")).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "u1");
        assert_eq!(docs[0].data["role"], "admin");
        assert_eq!(docs[0].data["name"], "Root");
    }

    #[tokio::test]
    async fn transport_failures_map_to_transport_error() {
        // Point at a port that's not listening
        let store = HttpDocumentStore::new(&HttpStoreConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: None,
            timeout_secs: 1,
        });

        let err = store.insert("notifications", &json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
