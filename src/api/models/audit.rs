//! Append-only audit trail entries.

use super::enums::{AuditAction, AuditEntity};
use super::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One audited action. Entries are written after every mutation and every
/// sensitive read (export); the core never reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    pub id: EntityId,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: String,
    /// Absent for anonymous actions (public submission ingestion).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    /// Snapshot of the affected data.
    #[schema(value_type = Object)]
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        entity: AuditEntity,
        entity_id: String,
        user_id: Option<EntityId>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            action,
            entity,
            entity_id,
            user_id,
            detail,
            created_at: Utc::now(),
        }
    }
}
