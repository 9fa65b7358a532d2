//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod auth_context;
pub mod error;
pub mod forms;
pub mod openapi;
pub mod submissions;

use crate::middleware::rate_limit;
use axum::Router;
// Re-export AppState from app_state module for convenience
pub use app_state::AppState;

/// Create the main API router combining all route modules
pub fn create_api_router(_app_state: AppState) -> Router<AppState> {
    // Public submission ingestion is the only unauthenticated write path;
    // it gets its own rate limiter.
    let submission_limiter = rate_limit::create_rate_limiter();

    Router::new()
        .nest("/forms", forms::forms_router())
        .nest(
            "/forms-submissions",
            submissions::submissions_router().layer(axum::middleware::from_fn_with_state(
                submission_limiter,
                rate_limit::rate_limit_middleware,
            )),
        )
        // OpenAPI documentation endpoints
        .merge(openapi::openapi_router())
    // Note: State is applied by callers who need it (e.g., TestServer)
    // For production use, call .with_state(app_state) after creating the router
}

/// Create the application state (synchronous; in-memory storage).
///
/// Note: For PostgreSQL storage, call `init_storage()` on the returned state.
pub fn create_app_state() -> AppState {
    AppState::new()
}

/// Create the application state with storage initialization (async).
///
/// This is the preferred method for production use.
pub async fn create_app_state_with_storage() -> Result<AppState, crate::storage::StorageError> {
    let mut state = AppState::new();
    state.init_storage().await?;
    Ok(state)
}
