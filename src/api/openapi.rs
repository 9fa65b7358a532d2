//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation
//! generation.

use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, openapi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Forms
        crate::routes::forms::create_form,
        crate::routes::forms::find_all_by_user,
        crate::routes::forms::find_by_slug,
        crate::routes::forms::find_one,
        crate::routes::forms::delete_form,
        crate::routes::forms::export_submissions,
        crate::routes::forms::permissions_add,
        crate::routes::forms::permissions_remove,
        // Submissions
        crate::routes::submissions::create_submission,
    ),
    components(schemas(
        crate::models::EntityId,
        crate::models::Form,
        crate::models::FormBasicInfo,
        crate::models::Question,
        crate::models::QuestionOption,
        crate::models::CreateFormRequest,
        crate::models::QuestionInput,
        crate::models::QuestionOptionInput,
        crate::models::AddPermissionRequest,
        crate::models::RemovePermissionRequest,
        crate::models::FormRole,
        crate::models::FormRoleInfo,
        crate::models::FormSubmission,
        crate::models::Answer,
        crate::models::AnswerInput,
        crate::models::AnswerOption,
        crate::models::CreateSubmissionRequest,
        crate::models::UserBasicInfo,
        crate::models::enums::QuestionType,
        crate::models::enums::RoleKind,
        crate::services::form_service::FormWithRoles,
        crate::services::form_service::FormSummary,
        crate::services::form_service::PermissionGrant,
        crate::services::form_service::PermissionRemoval,
        crate::services::role_service::GrantOutcome,
    )),
    tags(
        (name = "Forms", description = "Form lifecycle and permission management"),
        (name = "Submissions", description = "Submission ingestion")
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme used by authenticated routes.
pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
