//! Audit trail recorder.
//!
//! Every mutating action and every export writes one entry through here.
//! The recorder runs after the primary mutation has committed; a failed
//! audit write is logged and swallowed so the primary business outcome is
//! never rolled back over audit completeness.

use crate::models::{AuditAction, AuditEntity, AuditEntry, EntityId};
use crate::storage::StorageBackend;
use std::sync::Arc;
use tracing::warn;

/// Append-only audit recorder.
pub struct AuditRecorder {
    storage: Arc<dyn StorageBackend>,
}

impl AuditRecorder {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Record one action. `user_id` is absent for anonymous actions
    /// (public submission ingestion).
    pub async fn record(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: &str,
        user_id: Option<&EntityId>,
        detail: serde_json::Value,
    ) {
        let entry = AuditEntry::new(
            action,
            entity,
            entity_id.to_string(),
            user_id.cloned(),
            detail,
        );

        if let Err(e) = self.storage.append_audit(&entry).await {
            warn!(
                "audit write failed for {:?} {:?} {}: {}",
                action, entity, entity_id, e
            );
        }
    }
}
