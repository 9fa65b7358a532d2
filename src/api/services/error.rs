//! Core error taxonomy.
//!
//! Every public service operation returns `CoreError`. Storage failures are
//! reclassified here instead of leaking to callers; the messages are stable
//! machine-readable codes, never raw storage error text.

use crate::storage::StorageError;
use thiserror::Error;

/// Failure taxonomy of the forms core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed id or missing/invalid required field
    #[error("{0}")]
    InvalidInput(String),
    /// Entity absent, or invisible due to soft-delete/unpublished state
    #[error("{0}")]
    NotFound(String),
    /// Caller lacks the required role for the action
    #[error("{0}")]
    Forbidden(String),
    /// Duplicate unique field
    #[error("{0}")]
    Conflict(String),
    /// Storage or downstream failure not attributable to caller input
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity_type, .. } => {
                Self::NotFound(format!("{}_not_found", entity_type.replace('-', "_")))
            }
            StorageError::Duplicate { entity_type, field } => {
                Self::Conflict(format!("{}_{}_already_exists", entity_type, field))
            }
            StorageError::ConnectionError(detail) | StorageError::Other(detail) => {
                tracing::error!("storage failure: {}", detail);
                Self::Internal("internal_error".to_string())
            }
        }
    }
}
