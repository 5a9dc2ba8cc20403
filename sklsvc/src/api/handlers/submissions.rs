use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::AppState;
use crate::api::models::{CreatedResponse, submissions::SubmissionCreateRequest};
use crate::errors::{Error, Result};
use crate::store::SUBMISSIONS_COLLECTION;

#[utoipa::path(
    post,
    path = "/api/v1/submissions",
    tag = "submissions",
    summary = "Record a work submission",
    description = "Persists the submission and notifies every admin. Notification delivery is \
                   best-effort and never fails the submission itself.",
    request_body = SubmissionCreateRequest,
    responses(
        (status = 201, description = "Submission recorded", body = CreatedResponse),
        (status = 500, description = "Document store failure")
    )
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(request): Json<SubmissionCreateRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let document = json!({
        "userId": &request.user_id,
        "userName": &request.user_name,
        "platform": &request.platform,
        "description": &request.description,
        "amount": request.amount,
        "status": "pending",
        "createdAt": chrono::Utc::now(),
    });

    let id = state
        .store
        .insert(SUBMISSIONS_COLLECTION, &document)
        .await
        .map_err(|e| Error::Internal {
            operation: format!("record submission: {e}"),
        })?;

    tracing::info!(submission_id = %id, user_id = %request.user_id, "Submission recorded");

    // Best-effort side effect: a notification failure never fails the submission.
    state
        .notifier
        .notify_submission(
            &request.user_id,
            &request.user_name,
            &request.platform,
            &request.description,
            request.amount,
        )
        .await;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::store::{MemoryDocumentStore, NOTIFICATIONS_COLLECTION, SUBMISSIONS_COLLECTION};
    use crate::test_utils::{FailingStore, create_test_app, create_test_app_with_store};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn submission_is_persisted_and_admins_notified() {
        let (server, store) = create_test_app("http://127.0.0.1:1", vec!["admin-1".to_string(), "admin-2".to_string()]);

        let response = server
            .post("/api/v1/submissions")
            .json(&json!({
                "userId": "user-9",
                "userName": "Alice",
                "platform": "YouTube",
                "description": "Edited the intro video",
                "amount": "1500"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert!(!response.json::<Value>()["id"].as_str().unwrap().is_empty());

        let submissions = store.documents(SUBMISSIONS_COLLECTION);
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].data["userId"], "user-9");
        assert_eq!(submissions[0].data["status"], "pending");

        let notifications = store.documents(NOTIFICATIONS_COLLECTION);
        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(|n| n.data["type"] == "user_submission"));
    }

    #[tokio::test]
    async fn submission_succeeds_with_no_admins() {
        let (server, store) = create_test_app("http://127.0.0.1:1", vec![]);

        let response = server
            .post("/api/v1/submissions")
            .json(&json!({
                "userId": "user-9",
                "userName": "Alice",
                "platform": "Fiverr",
                "description": "Logo design",
                "amount": "300"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(store.documents(SUBMISSIONS_COLLECTION).len(), 1);
        assert!(store.documents(NOTIFICATIONS_COLLECTION).is_empty());
    }

    #[tokio::test]
    async fn store_failure_on_the_primary_write_is_a_500() {
        let inner = Arc::new(MemoryDocumentStore::new());
        let store = Arc::new(FailingStore {
            inner: inner.clone(),
            fail_collection: SUBMISSIONS_COLLECTION,
        });
        let server = create_test_app_with_store("http://127.0.0.1:1", vec!["admin-1".to_string()], store);

        let response = server
            .post("/api/v1/submissions")
            .json(&json!({
                "userId": "user-9",
                "userName": "Alice",
                "platform": "YouTube",
                "description": "Edited the intro video",
                "amount": "1500"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["error"], "Internal server error");
        // The handler bailed before the fan-out.
        assert!(inner.documents(NOTIFICATIONS_COLLECTION).is_empty());
    }

    #[tokio::test]
    async fn failed_fan_out_does_not_fail_the_submission() {
        let inner = Arc::new(MemoryDocumentStore::new());
        let store = Arc::new(FailingStore {
            inner: inner.clone(),
            fail_collection: NOTIFICATIONS_COLLECTION,
        });
        let server = create_test_app_with_store("http://127.0.0.1:1", vec!["admin-1".to_string()], store);

        let response = server
            .post("/api/v1/submissions")
            .json(&json!({
                "userId": "user-9",
                "userName": "Alice",
                "platform": "YouTube",
                "description": "Edited the intro video",
                "amount": "1500"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(inner.documents(SUBMISSIONS_COLLECTION).len(), 1);
        assert!(inner.documents(NOTIFICATIONS_COLLECTION).is_empty());
    }
}
