//! Storage trait definition for the API storage backends.
//!
//! The trait is the narrow persistence boundary of the forms core: five
//! collections (users, forms, roles, submissions, audit entries) with
//! find/create/update/delete operations. Reads return rows regardless of
//! soft-delete state; visibility filtering belongs to the service layer.

use crate::models::{AuditEntry, EntityId, Form, FormRole, FormSubmission, User};

/// Storage backend trait for database operations
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Get a user by id
    async fn get_user(&self, id: &EntityId) -> Result<Option<User>, super::StorageError>;

    /// Get a user by unique email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, super::StorageError>;

    /// Create a new user. Fails with `Duplicate` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), super::StorageError>;

    /// Create a new form. Fails with `Duplicate` if the slug is taken.
    async fn create_form(&self, form: &Form) -> Result<(), super::StorageError>;

    /// Get a form by id, including soft-deleted rows
    async fn get_form(&self, id: &EntityId) -> Result<Option<Form>, super::StorageError>;

    /// Get a form by unique slug, including soft-deleted rows
    async fn get_form_by_slug(&self, slug: &str) -> Result<Option<Form>, super::StorageError>;

    /// List all forms, including soft-deleted rows
    async fn list_forms(&self) -> Result<Vec<Form>, super::StorageError>;

    /// Update an existing form in place
    async fn update_form(&self, form: &Form) -> Result<(), super::StorageError>;

    /// Insert or replace the grant for (form, user). The single-row-per-pair
    /// invariant is enforced here, not best-effort in the caller.
    async fn upsert_form_role(&self, role: &FormRole) -> Result<(), super::StorageError>;

    /// Get the grant for (form, user), if any
    async fn get_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<Option<FormRole>, super::StorageError>;

    /// List all grants on a form
    async fn list_roles_for_form(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormRole>, super::StorageError>;

    /// List all grants held by a user
    async fn list_roles_for_user(
        &self,
        user_id: &EntityId,
    ) -> Result<Vec<FormRole>, super::StorageError>;

    /// Delete the grant for (form, user). Returns whether a grant existed.
    async fn delete_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<bool, super::StorageError>;

    /// Persist a submission together with all of its answers
    async fn create_submission(
        &self,
        submission: &FormSubmission,
    ) -> Result<(), super::StorageError>;

    /// List a form's submissions, oldest first
    async fn list_submissions(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormSubmission>, super::StorageError>;

    /// Count a form's submissions
    async fn count_submissions(&self, form_id: &EntityId) -> Result<i64, super::StorageError>;

    /// Append an audit entry
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), super::StorageError>;
}
