pub mod avatars;
pub mod submissions;
pub mod withdrawals;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for a recorded business document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    /// Id assigned by the document store
    pub id: String,
}
