//! Client for the external image host's unsigned upload API.
//!
//! The image host is the system of record for avatar assets: nothing is
//! persisted locally, and a failed upload is terminal for the request.
//! Single attempt, no retry.

use std::time::Duration;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::ImageHostConfig;
use crate::errors::{Error, Result};

/// Fallback when the image host rejects an upload without a usable message.
const UPLOAD_FAILED_FALLBACK: &str = "Cloudinary upload failed";

/// Normalized result of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// CDN-hosted secure URL reported by the image host
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct UploadApiResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadApiError {
    error: UploadApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct UploadApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    folder: String,
}

impl ImageHostClient {
    pub fn new(config: &ImageHostConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create image host HTTP client");

        Self {
            client,
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                config.base_url.trim_end_matches('/'),
                config.cloud_name
            ),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        }
    }

    /// Upload one image on behalf of `owner_id`.
    ///
    /// The generated public id is `{owner_id}-{epoch_millis}`. Two uploads by
    /// the same owner within the same millisecond collide; known limitation,
    /// kept as-is.
    pub async fn upload(&self, owner_id: &str, filename: &str, content_type: &str, bytes: Vec<u8>) -> Result<StoredImage> {
        let public_id = format!("{}-{}", owner_id, Utc::now().timestamp_millis());

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| Error::Upload {
                message: format!("invalid content type {content_type}: {e}"),
            })?;

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone())
            .text("public_id", public_id);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload { message: e.to_string() })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<UploadApiError>().await {
                Ok(body) => body.error.message,
                Err(_) => UPLOAD_FAILED_FALLBACK.to_string(),
            };
            tracing::warn!(status = %status, message = %message, "Image host rejected upload");
            return Err(Error::Upstream { message });
        }

        let accepted: UploadApiResponse = response.json().await.map_err(|e| Error::Upload { message: e.to_string() })?;

        Ok(StoredImage { url: accepted.secure_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImageHostClient {
        ImageHostClient::new(&ImageHostConfig {
            base_url: server.uri(),
            cloud_name: "testcloud".to_string(),
            upload_preset: "test_preset".to_string(),
            folder: "test_avatars".to_string(),
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn upload_sends_preset_folder_and_public_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/testcloud/image/upload"))
            .and(body_string_contains("test_preset"))
            .and(body_string_contains("test_avatars"))
            .and(body_string_contains("user-7-"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://res.example.com/avatar.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let stored = client.upload("user-7", "avatar.png", "image/png", vec![1, 2, 3]).await.unwrap();

        assert_eq!(stored.url, "https://res.example.com/avatar.png");
    }

    #[tokio::test]
    async fn upstream_error_message_is_surfaced_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid upload preset" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.upload("user-7", "a.png", "image/png", vec![0]).await.unwrap_err();

        match err {
            Error::Upstream { message } => assert_eq!(message, "Invalid upload preset"),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_upstream_error_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway blew up"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.upload("user-7", "a.png", "image/png", vec![0]).await.unwrap_err();

        match err {
            Error::Upstream { message } => assert_eq!(message, UPLOAD_FAILED_FALLBACK),
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_maps_to_upload_error() {
        let client = ImageHostClient::new(&ImageHostConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            cloud_name: "testcloud".to_string(),
            upload_preset: "p".to_string(),
            folder: "f".to_string(),
            timeout_secs: 1,
        });

        let err = client.upload("user-7", "a.png", "image/png", vec![0]).await.unwrap_err();
        assert!(matches!(err, Error::Upload { .. }));
    }
}
