use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to record a work submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionCreateRequest {
    /// Submitter's user id
    pub user_id: String,
    /// Submitter's display name (interpolated into admin notifications)
    pub user_name: String,
    /// Platform the work was done on
    pub platform: String,
    /// Free-text description of the work
    pub description: String,
    /// Amount claimed for the work
    pub amount: Decimal,
}
