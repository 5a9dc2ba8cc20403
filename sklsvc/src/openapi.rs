//! OpenAPI documentation for the service API at `/api/v1/*`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sklsvc",
        description = "Avatar uploads and admin notification fan-out for the SKL app backend."
    ),
    paths(
        api::handlers::avatars::upload_avatar,
        api::handlers::submissions::create_submission,
        api::handlers::withdrawals::create_withdrawal,
    ),
    components(schemas(
        api::models::CreatedResponse,
        api::models::avatars::AvatarUploadResponse,
        api::models::submissions::SubmissionCreateRequest,
        api::models::withdrawals::WithdrawalCreateRequest,
    )),
    tags(
        (name = "uploads", description = "Avatar image uploads"),
        (name = "submissions", description = "Work submission records"),
        (name = "withdrawals", description = "Withdrawal request records")
    )
)]
pub struct ApiDoc;
