//! In-memory storage backend.
//!
//! Used by the test suite and by development mode when `DATABASE_URL` is
//! not set. Collections are plain maps behind async mutexes; uniqueness
//! checks mirror the constraints the PostgreSQL backend enforces.

use super::{StorageError, traits::StorageBackend};
use crate::models::{AuditEntry, EntityId, Form, FormRole, FormSubmission, User};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryStorageBackend {
    users: Mutex<HashMap<EntityId, User>>,
    forms: Mutex<HashMap<EntityId, Form>>,
    roles: Mutex<HashMap<(EntityId, EntityId), FormRole>>,
    submissions: Mutex<Vec<FormSubmission>>,
    audit: Mutex<Vec<AuditEntry>>,
}

impl MemoryStorageBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read of the audit log, bypassing the core. The trait exposes
    /// no audit reads; tests use this to verify the write-only side channel.
    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().await.clone()
    }

    /// Direct read of a form row, bypassing the core's visibility predicate.
    pub async fn raw_form(&self, id: &EntityId) -> Option<Form> {
        self.forms.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn get_user(&self, id: &EntityId) -> Result<Option<User>, StorageError> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StorageError::Duplicate {
                entity_type: "user".to_string(),
                field: "email".to_string(),
            });
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn create_form(&self, form: &Form) -> Result<(), StorageError> {
        let mut forms = self.forms.lock().await;
        if forms.values().any(|f| f.slug == form.slug) {
            return Err(StorageError::Duplicate {
                entity_type: "form".to_string(),
                field: "slug".to_string(),
            });
        }
        forms.insert(form.id.clone(), form.clone());
        Ok(())
    }

    async fn get_form(&self, id: &EntityId) -> Result<Option<Form>, StorageError> {
        Ok(self.forms.lock().await.get(id).cloned())
    }

    async fn get_form_by_slug(&self, slug: &str) -> Result<Option<Form>, StorageError> {
        Ok(self
            .forms
            .lock()
            .await
            .values()
            .find(|f| f.slug == slug)
            .cloned())
    }

    async fn list_forms(&self) -> Result<Vec<Form>, StorageError> {
        Ok(self.forms.lock().await.values().cloned().collect())
    }

    async fn update_form(&self, form: &Form) -> Result<(), StorageError> {
        let mut forms = self.forms.lock().await;
        if !forms.contains_key(&form.id) {
            return Err(StorageError::NotFound {
                entity_type: "form".to_string(),
                entity_id: form.id.to_string(),
            });
        }
        forms.insert(form.id.clone(), form.clone());
        Ok(())
    }

    async fn upsert_form_role(&self, role: &FormRole) -> Result<(), StorageError> {
        self.roles
            .lock()
            .await
            .insert((role.form_id.clone(), role.user_id.clone()), role.clone());
        Ok(())
    }

    async fn get_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<Option<FormRole>, StorageError> {
        Ok(self
            .roles
            .lock()
            .await
            .get(&(form_id.clone(), user_id.clone()))
            .cloned())
    }

    async fn list_roles_for_form(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormRole>, StorageError> {
        let mut roles: Vec<FormRole> = self
            .roles
            .lock()
            .await
            .values()
            .filter(|r| &r.form_id == form_id)
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(roles)
    }

    async fn list_roles_for_user(
        &self,
        user_id: &EntityId,
    ) -> Result<Vec<FormRole>, StorageError> {
        let mut roles: Vec<FormRole> = self
            .roles
            .lock()
            .await
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(roles)
    }

    async fn delete_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<bool, StorageError> {
        Ok(self
            .roles
            .lock()
            .await
            .remove(&(form_id.clone(), user_id.clone()))
            .is_some())
    }

    async fn create_submission(&self, submission: &FormSubmission) -> Result<(), StorageError> {
        self.submissions.lock().await.push(submission.clone());
        Ok(())
    }

    async fn list_submissions(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormSubmission>, StorageError> {
        Ok(self
            .submissions
            .lock()
            .await
            .iter()
            .filter(|s| &s.form_id == form_id)
            .cloned()
            .collect())
    }

    async fn count_submissions(&self, form_id: &EntityId) -> Result<i64, StorageError> {
        Ok(self
            .submissions
            .lock()
            .await
            .iter()
            .filter(|s| &s.form_id == form_id)
            .count() as i64)
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StorageError> {
        self.audit.lock().await.push(entry.clone());
        Ok(())
    }
}
