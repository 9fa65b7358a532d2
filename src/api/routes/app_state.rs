//! Application state management.
//!
//! Defines the AppState struct that holds the storage backend and the JWT
//! service shared across all route handlers.

use crate::services::form_service::PermissionPolicy;
use crate::services::jwt_service::JwtService;
use crate::storage::{MemoryStorageBackend, PostgresStorageBackend, StorageBackend, StorageError};
use std::sync::Arc;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (in-memory or PostgreSQL)
    pub storage: Arc<dyn StorageBackend>,
    /// JWT service for bearer-token validation
    pub jwt: Arc<JwtService>,
    /// Who may manage per-form permissions
    pub permission_policy: PermissionPolicy,
}

impl AppState {
    /// Create a new application state with in-memory storage and a JWT
    /// service configured from the environment.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStorageBackend::new()),
            jwt: Arc::new(JwtService::from_env()),
            permission_policy: PermissionPolicy::from_env(),
        }
    }

    /// Create application state from explicit parts. Used by tests and by
    /// embedders that manage their own configuration.
    pub fn with_parts(storage: Arc<dyn StorageBackend>, jwt: JwtService) -> Self {
        Self {
            storage,
            jwt: Arc::new(jwt),
            permission_policy: PermissionPolicy::default(),
        }
    }

    /// Initialize storage backend from environment configuration.
    ///
    /// Connects to PostgreSQL if DATABASE_URL is set and creates the schema;
    /// otherwise keeps the in-memory backend.
    pub async fn init_storage(&mut self) -> Result<(), StorageError> {
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            match sqlx::PgPool::connect(&database_url).await {
                Ok(pool) => {
                    let backend = PostgresStorageBackend::new(pool);
                    backend.init_schema().await?;
                    self.storage = Arc::new(backend);
                    Ok(())
                }
                Err(e) => Err(StorageError::ConnectionError(format!(
                    "Failed to connect to database: {}",
                    e
                ))),
            }
        } else {
            // In-memory storage (no database)
            Ok(())
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
