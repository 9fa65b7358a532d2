//! Submission routes.
//!
//! Public endpoint: respondents are anonymous, so no authentication is
//! required. The router is rate-limited where it is mounted.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::post};

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::{CreateSubmissionRequest, FormSubmission};
use crate::services::submission_service::SubmissionService;

/// Create the submissions router
pub fn submissions_router() -> Router<AppState> {
    Router::new().route("/", post(create_submission))
}

/// POST /forms-submissions - Submit answers against a published form
#[utoipa::path(
    post,
    path = "/forms-submissions",
    tag = "Submissions",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission stored", body = FormSubmission),
        (status = 400, description = "Malformed id or payload"),
        (status = 404, description = "Form absent, unpublished, or deleted"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<FormSubmission>), ApiError> {
    let submission = SubmissionService::new(state.storage.clone())
        .submit(request)
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}
