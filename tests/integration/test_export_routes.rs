//! End-to-end tests of submission export over the HTTP surface.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use chrono::Utc;
use forms_api::models::{EntityId, User};
use forms_api::routes::{self, AppState};
use forms_api::services::jwt_service::JwtService;
use forms_api::storage::{MemoryStorageBackend, StorageBackend};
use serde_json::{Value, json};
use std::sync::Arc;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

fn test_server(storage: Arc<MemoryStorageBackend>) -> TestServer {
    let state = AppState::with_parts(storage, JwtService::new(TEST_SECRET));
    let app = axum::Router::new()
        .nest("/api/v1", routes::create_api_router(state.clone()))
        .with_state(state);
    TestServer::new(app).unwrap()
}

async fn seed_user(storage: &Arc<MemoryStorageBackend>, email: &str) -> User {
    let user = User {
        id: EntityId::generate(),
        email: email.to_string(),
        name: email.split('@').next().unwrap().to_string(),
        last_name: None,
        is_admin: false,
        is_active: true,
        created_at: Utc::now(),
    };
    storage.create_user(&user).await.unwrap();
    user
}

fn bearer(user: &User) -> HeaderValue {
    let token = JwtService::new(TEST_SECRET)
        .generate_access_token(user)
        .unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_export_requires_a_role_and_projects_one_row_per_submission() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let u1 = seed_user(&storage, "u1@example.com").await;
    let u2 = seed_user(&storage, "u2@example.com").await;

    let created: Value = server
        .post("/api/v1/forms")
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .json(&json!({
            "title": "Feedback",
            "questions": [
                {"title": "Name", "is_required": false, "type": "short-text"},
                {
                    "title": "Color?",
                    "is_required": false,
                    "type": "radio",
                    "options": [
                        {"value": "Red"},
                        {"value": "Blue"}
                    ]
                }
            ]
        }))
        .await
        .json();
    let form_id = created["form"]["id"].as_str().unwrap().to_string();
    let name_q = created["form"]["questions"][0]["id"].as_str().unwrap();
    let color_q = created["form"]["questions"][1]["id"].as_str().unwrap();

    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": form_id,
            "answers": [
                {"question_id": name_q, "type": "short-text", "title": "Name", "value": "Ada"},
                {
                    "question_id": color_q,
                    "type": "radio",
                    "title": "Color?",
                    "values": [{"value": "Red"}]
                }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let export_path = format!("/api/v1/forms/{}/submissions/export", form_id);

    // A user with no role on the form is refused.
    let response = server
        .get(&export_path)
        .add_header(header::AUTHORIZATION, bearer(&u2))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // After receiving a collaborator role, the same call succeeds.
    let response = server
        .post(&format!("/api/v1/forms/{}/permissions/add", form_id))
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .json(&json!({"email": "u2@example.com", "role": "editor"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get(&export_path)
        .add_header(header::AUTHORIZATION, bearer(&u2))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let csv = response.text();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2); // header + one row per submission
    assert_eq!(lines[0], "Name,Color?");
    assert_eq!(lines[1], "Ada,Red");
}

#[tokio::test]
async fn test_export_of_a_deleted_form_is_not_found() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let u1 = seed_user(&storage, "u1@example.com").await;

    let created: Value = server
        .post("/api/v1/forms")
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .json(&json!({"title": "Gone", "questions": []}))
        .await
        .json();
    let form_id = created["form"]["id"].as_str().unwrap().to_string();

    server
        .delete(&format!("/api/v1/forms/{}", form_id))
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .await;

    let response = server
        .get(&format!("/api/v1/forms/{}/submissions/export", form_id))
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_is_audited_as_a_sensitive_read() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let u1 = seed_user(&storage, "u1@example.com").await;

    let created: Value = server
        .post("/api/v1/forms")
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .json(&json!({"title": "Audited", "questions": []}))
        .await
        .json();
    let form_id = created["form"]["id"].as_str().unwrap().to_string();

    server
        .get(&format!("/api/v1/forms/{}/submissions/export", form_id))
        .add_header(header::AUTHORIZATION, bearer(&u1))
        .await;

    let audit = storage.audit_entries().await;
    let last = audit.last().unwrap();
    assert_eq!(
        serde_json::to_value(last.action).unwrap(),
        json!("export")
    );
    assert_eq!(last.entity_id, form_id);
}
