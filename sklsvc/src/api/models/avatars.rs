use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized result of a stored avatar.
///
/// Echoes the original file's name, size, and declared type alongside the
/// CDN URL reported by the image host.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvatarUploadResponse {
    /// CDN-hosted secure URL of the stored avatar
    pub url: String,
    /// Original filename as uploaded
    pub filename: String,
    /// Original file size in bytes
    pub size: u64,
    /// Declared MIME type
    #[serde(rename = "type")]
    pub content_type: String,
}
