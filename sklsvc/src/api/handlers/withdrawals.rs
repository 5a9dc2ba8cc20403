use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::AppState;
use crate::api::models::{CreatedResponse, withdrawals::WithdrawalCreateRequest};
use crate::errors::{Error, Result};
use crate::store::WITHDRAWALS_COLLECTION;

#[utoipa::path(
    post,
    path = "/api/v1/withdrawals",
    tag = "withdrawals",
    summary = "Record a withdrawal request",
    description = "Persists the withdrawal request and notifies every admin. Notification \
                   delivery is best-effort and never fails the request itself.",
    request_body = WithdrawalCreateRequest,
    responses(
        (status = 201, description = "Withdrawal request recorded", body = CreatedResponse),
        (status = 500, description = "Document store failure")
    )
)]
pub async fn create_withdrawal(
    State(state): State<AppState>,
    Json(request): Json<WithdrawalCreateRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let document = json!({
        "userId": &request.user_id,
        "userName": &request.user_name,
        "amount": request.amount,
        "bankAccount": &request.bank_account,
        "status": "pending",
        "createdAt": chrono::Utc::now(),
    });

    let id = state
        .store
        .insert(WITHDRAWALS_COLLECTION, &document)
        .await
        .map_err(|e| Error::Internal {
            operation: format!("record withdrawal: {e}"),
        })?;

    tracing::info!(withdrawal_id = %id, user_id = %request.user_id, "Withdrawal request recorded");

    state
        .notifier
        .notify_withdrawal(
            &request.user_id,
            &request.user_name,
            request.amount,
            &request.bank_account,
        )
        .await;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}
