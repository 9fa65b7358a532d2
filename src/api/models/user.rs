//! User records as consumed by the forms core.
//!
//! Credential material (passwords, verification state) never reaches this
//! crate; authentication resolves a bearer token to a stored user row
//! before any core operation runs.

use super::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn basic_info(&self) -> UserBasicInfo {
        UserBasicInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// The subset of user fields embedded in form responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBasicInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// The trusted identity of the acting user, resolved by the authentication
/// boundary and passed explicitly into every core operation.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: EntityId,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}
