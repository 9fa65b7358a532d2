//! Per-form permission grants.

use super::enums::RoleKind;
use super::id::EntityId;
use super::user::UserBasicInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A permission grant binding one user to one role on one form.
/// At most one grant exists per (form, user) pair; granting again replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormRole {
    pub form_id: EntityId,
    pub user_id: EntityId,
    pub role: RoleKind,
    pub granted_at: DateTime<Utc>,
}

impl FormRole {
    pub fn new(form_id: EntityId, user_id: EntityId, role: RoleKind) -> Self {
        Self {
            form_id,
            user_id,
            role,
            granted_at: Utc::now(),
        }
    }
}

/// A grant annotated with the holder's basic info, as embedded in form
/// responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormRoleInfo {
    pub user: UserBasicInfo,
    pub role: RoleKind,
}
