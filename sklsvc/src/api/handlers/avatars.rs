use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};

use crate::AppState;
use crate::api::models::avatars::AvatarUploadResponse;
use crate::config::{ALLOWED_AVATAR_TYPES, MAX_AVATAR_BYTES};
use crate::errors::{Error, Result};

/// An uploaded avatar file as received from the multipart form.
struct IncomingFile {
    filename: String,
    content_type: String,
    bytes: bytes::Bytes,
}

/// A body over the configured request limit aborts the multipart read before
/// the handler can measure the file, so the length-limit error has to map to
/// the same size message the explicit check produces.
fn multipart_error(err: MultipartError, context: &str) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::BadRequest {
            message: "File size exceeds 500KB limit".to_string(),
        };
    }
    Error::BadRequest {
        message: format!("{context}: {err}"),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/uploads/avatar",
    tag = "uploads",
    summary = "Upload avatar image",
    description = "Validates an avatar image and forwards it to the image host. \
                   The image host is the system of record for the asset; nothing is persisted locally.",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields `file` (the image) and `userId` (the owner)"
    ),
    responses(
        (status = 200, description = "Avatar stored", body = AvatarUploadResponse),
        (status = 400, description = "Validation failure"),
        (status = 500, description = "Image host or transport failure")
    )
)]
pub async fn upload_avatar(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<AvatarUploadResponse>> {
    let mut file: Option<IncomingFile> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart data"))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read file"))?;
                file = Some(IncomingFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "userId" => {
                user_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, "Failed to read userId"))?,
                );
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    // Precondition order is part of the contract: first failure wins,
    // and nothing goes upstream until all checks pass.
    let Some(file) = file else {
        return Err(Error::BadRequest {
            message: "No file provided".to_string(),
        });
    };

    let user_id = match user_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(Error::BadRequest {
                message: "User ID required".to_string(),
            });
        }
    };

    if file.bytes.len() > MAX_AVATAR_BYTES {
        return Err(Error::BadRequest {
            message: "File size exceeds 500KB limit".to_string(),
        });
    }

    if !ALLOWED_AVATAR_TYPES.contains(&file.content_type.as_str()) {
        return Err(Error::BadRequest {
            message: "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.".to_string(),
        });
    }

    let size = file.bytes.len() as u64;
    let stored = state
        .image_host
        .upload(&user_id, &file.filename, &file.content_type, file.bytes.to_vec())
        .await?;

    tracing::info!(user_id = %user_id, filename = %file.filename, size, "Avatar uploaded");

    Ok(Json(AvatarUploadResponse {
        url: stored.url,
        filename: file.filename,
        size,
        content_type: file.content_type,
    }))
}
