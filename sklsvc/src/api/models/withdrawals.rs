use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to record a withdrawal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalCreateRequest {
    /// Requester's user id
    pub user_id: String,
    /// Requester's display name (interpolated into admin notifications)
    pub user_name: String,
    /// Amount to withdraw
    pub amount: Decimal,
    /// Target bank account identifier
    pub bank_account: String,
}
