//! Form routes: creation, lookup, listing, soft-deletion, permission
//! management, and submission export.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{
    AddPermissionRequest, CreateFormRequest, Form, FormBasicInfo, RemovePermissionRequest,
};
use crate::services::export_service::{ExportService, SubmissionTable};
use crate::services::form_service::{
    FormService, FormSummary, FormWithRoles, PermissionGrant, PermissionRemoval,
};

/// Create the forms router
pub fn forms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_form))
        .route("/find-all-by-user", get(find_all_by_user))
        .route("/find-by-slug/{slug}", get(find_by_slug))
        .route("/{id}", get(find_one).delete(delete_form))
        .route("/{id}/submissions/export", get(export_submissions))
        .route("/{id}/permissions/add", post(permissions_add))
        .route("/{id}/permissions/remove", post(permissions_remove))
}

/// POST /forms - Create a form owned by the authenticated user
#[utoipa::path(
    post,
    path = "/forms",
    tag = "Forms",
    request_body = CreateFormRequest,
    responses(
        (status = 201, description = "Form created", body = FormWithRoles),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug conflict, retry the creation")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_form(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<FormWithRoles>), ApiError> {
    let created = FormService::new(state.storage.clone())
        .create(request, &auth.user)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /forms/find-all-by-user - List forms visible to the authenticated user
#[utoipa::path(
    get,
    path = "/forms/find-all-by-user",
    tag = "Forms",
    responses(
        (status = 200, description = "Forms listed", body = [FormSummary]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn find_all_by_user(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<FormSummary>>, ApiError> {
    let forms = FormService::new(state.storage.clone())
        .list_for_user(&auth.user)
        .await?;
    Ok(Json(forms))
}

/// GET /forms/find-by-slug/{slug} - Public lookup of a published form
#[utoipa::path(
    get,
    path = "/forms/find-by-slug/{slug}",
    tag = "Forms",
    params(("slug" = String, Path, description = "Form slug")),
    responses(
        (status = 200, description = "Form found", body = FormBasicInfo),
        (status = 404, description = "Form not found")
    )
)]
pub async fn find_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<FormBasicInfo>, ApiError> {
    let form = FormService::new(state.storage.clone())
        .find_by_slug(&slug)
        .await?;
    Ok(Json(form))
}

/// GET /forms/{id} - Find one live form by id
#[utoipa::path(
    get,
    path = "/forms/{id}",
    tag = "Forms",
    params(("id" = String, Path, description = "Form id")),
    responses(
        (status = 200, description = "Form found", body = Form),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Form not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn find_one(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Form>, ApiError> {
    let form = FormService::new(state.storage.clone()).find_by_id(&id).await?;
    Ok(Json(form))
}

/// DELETE /forms/{id} - Soft-delete a form (owner only)
#[utoipa::path(
    delete,
    path = "/forms/{id}",
    tag = "Forms",
    params(("id" = String, Path, description = "Form id")),
    responses(
        (status = 200, description = "Form soft-deleted", body = Form),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own the form"),
        (status = 404, description = "Form not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_form(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Form>, ApiError> {
    let deleted = FormService::new(state.storage.clone())
        .soft_delete(&id, &auth.user)
        .await?;
    Ok(Json(deleted))
}

/// GET /forms/{id}/submissions/export - Export submissions as CSV
#[utoipa::path(
    get,
    path = "/forms/{id}/submissions/export",
    tag = "Forms",
    params(("id" = String, Path, description = "Form id")),
    responses(
        (status = 200, description = "CSV export of all submissions"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller holds no role on the form"),
        (status = 404, description = "Form not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_submissions(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let table = ExportService::new(state.storage.clone())
        .export_table(&id, &auth.user)
        .await?;

    let csv = table_to_csv(&table);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"submissions.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// POST /forms/{id}/permissions/add - Grant a role to a user by email
#[utoipa::path(
    post,
    path = "/forms/{id}/permissions/add",
    tag = "Forms",
    params(("id" = String, Path, description = "Form id")),
    request_body = AddPermissionRequest,
    responses(
        (status = 200, description = "Role granted or replaced", body = PermissionGrant),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Form or user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn permissions_add(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(request): Json<AddPermissionRequest>,
) -> Result<Json<PermissionGrant>, ApiError> {
    let grant = FormService::new(state.storage.clone())
        .with_permission_policy(state.permission_policy)
        .permissions_add(&id, request, &auth.user)
        .await?;
    Ok(Json(grant))
}

/// POST /forms/{id}/permissions/remove - Revoke a user's role by email
#[utoipa::path(
    post,
    path = "/forms/{id}/permissions/remove",
    tag = "Forms",
    params(("id" = String, Path, description = "Form id")),
    request_body = RemovePermissionRequest,
    responses(
        (status = 200, description = "Role revoked", body = PermissionRemoval),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No grant to revoke, or grant is owner"),
        (status = 404, description = "Form or user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn permissions_remove(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(request): Json<RemovePermissionRequest>,
) -> Result<Json<PermissionRemoval>, ApiError> {
    let removal = FormService::new(state.storage.clone())
        .with_permission_policy(state.permission_policy)
        .permissions_remove(&id, request, &auth.user)
        .await?;
    Ok(Json(removal))
}

/// Render the projected table as CSV. This is the delegated tabular sink;
/// the projector itself only supplies columns and rows.
fn table_to_csv(table: &SubmissionTable) -> String {
    let mut out = String::new();

    let header: Vec<String> = table
        .columns
        .iter()
        .map(|column| csv_escape(&column.header))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|cell| csv_escape(cell)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
