//! End-to-end tests of submission ingestion over the HTTP surface.

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

async fn seed_author(storage: &Arc<MemoryStorageBackend>) -> User {
    let user = User {
        id: EntityId::generate(),
        email: "author@example.com".to_string(),
        name: "Author".to_string(),
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

/// Create a published form through the API, returning (form id, question id).
async fn create_form(server: &TestServer, author: &User) -> (String, String) {
    let body: Value = server
        .post("/api/v1/forms")
        .add_header(header::AUTHORIZATION, bearer(author))
        .json(&json!({
            "title": "Survey",
            "questions": [{
                "title": "Color?",
                "is_required": false,
                "type": "short-text"
            }]
        }))
        .await
        .json();
    (
        body["form"]["id"].as_str().unwrap().to_string(),
        body["form"]["questions"][0]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_minimal_answer_is_normalized_to_total_shape() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let author = seed_author(&storage).await;
    let (form_id, question_id) = create_form(&server, &author).await;

    // No value, no values: the stored answer still carries both.
    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": form_id,
            "answers": [{
                "question_id": question_id,
                "type": "short-text",
                "title": "Color?"
            }]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["answers"][0]["value"], "");
    assert_eq!(body["answers"][0]["values"], json!([]));

    let stored = storage
        .list_submissions(&EntityId::parse(&form_id).unwrap())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].answers[0].value, "");
    assert!(stored[0].answers[0].values.is_empty());
}

#[tokio::test]
async fn test_submission_does_not_require_authentication() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let author = seed_author(&storage).await;
    let (form_id, question_id) = create_form(&server, &author).await;

    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": form_id,
            "answers": [{
                "question_id": question_id,
                "type": "short-text",
                "title": "Color?",
                "value": "Red"
            }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_submitting_to_an_unknown_form_is_not_found() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage);

    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": EntityId::generate().to_string(),
            "answers": []
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submitting_to_a_deleted_form_is_not_found() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let author = seed_author(&storage).await;
    let (form_id, question_id) = create_form(&server, &author).await;

    server
        .delete(&format!("/api/v1/forms/{}", form_id))
        .add_header(header::AUTHORIZATION, bearer(&author))
        .await;

    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": form_id,
            "answers": [{
                "question_id": question_id,
                "type": "short-text",
                "title": "Color?",
                "value": "Red"
            }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_ids_and_unknown_type_tags_are_bad_requests() {
    let storage = Arc::new(MemoryStorageBackend::new());
    let server = test_server(storage.clone());
    let author = seed_author(&storage).await;
    let (form_id, question_id) = create_form(&server, &author).await;

    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({"form_id": "garbage", "answers": []}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // The question type tag set is closed.
    let response = server
        .post("/api/v1/forms-submissions")
        .json(&json!({
            "form_id": form_id,
            "answers": [{
                "question_id": question_id,
                "type": "telepathy",
                "title": "Color?"
            }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
