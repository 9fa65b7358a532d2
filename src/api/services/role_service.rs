//! Role store: the authoritative source of "who may do what" per form.

use crate::models::{EntityId, FormRole, RoleKind};
use crate::services::error::CoreError;
use crate::storage::StorageBackend;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Whether a grant created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GrantOutcome {
    Created,
    Updated,
}

/// Per-form permission store.
pub struct RoleService {
    storage: Arc<dyn StorageBackend>,
}

impl RoleService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Grant `role` to a user on a form. A user holds at most one role per
    /// form: an existing grant is replaced, not duplicated. The storage
    /// upsert keyed on (form, user) keeps that true under concurrency.
    pub async fn grant(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
        role: RoleKind,
    ) -> Result<(GrantOutcome, FormRole), CoreError> {
        let outcome = match self.storage.get_form_role(form_id, user_id).await? {
            Some(_) => GrantOutcome::Updated,
            None => GrantOutcome::Created,
        };

        let grant = FormRole::new(form_id.clone(), user_id.clone(), role);
        self.storage.upsert_form_role(&grant).await?;
        Ok((outcome, grant))
    }

    /// Revoke a user's grant on a form. Fails when no grant exists, and
    /// refuses to remove an `owner` grant: ownership only ends by
    /// soft-deleting the whole form.
    pub async fn revoke(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<FormRole, CoreError> {
        let existing = self
            .storage
            .get_form_role(form_id, user_id)
            .await?
            .ok_or_else(|| CoreError::forbidden("not_permitted"))?;

        if existing.role == RoleKind::Owner {
            return Err(CoreError::forbidden("cannot_remove_owner"));
        }

        self.storage.delete_form_role(form_id, user_id).await?;
        Ok(existing)
    }

    /// Whether the user holds exactly `role` on the form.
    pub async fn has_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
        role: RoleKind,
    ) -> Result<bool, CoreError> {
        Ok(self
            .storage
            .get_form_role(form_id, user_id)
            .await?
            .is_some_and(|grant| grant.role == role))
    }

    /// Whether the user holds any role at all on the form.
    pub async fn any_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<bool, CoreError> {
        Ok(self.storage.get_form_role(form_id, user_id).await?.is_some())
    }

    /// All grants on a form, oldest first.
    pub async fn roles_for_form(&self, form_id: &EntityId) -> Result<Vec<FormRole>, CoreError> {
        Ok(self.storage.list_roles_for_form(form_id).await?)
    }

    /// All grants held by a user, oldest first.
    pub async fn roles_for_user(&self, user_id: &EntityId) -> Result<Vec<FormRole>, CoreError> {
        Ok(self.storage.list_roles_for_user(user_id).await?)
    }
}
