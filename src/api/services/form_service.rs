//! Form lifecycle manager.
//!
//! Create/find/list/soft-delete forms and manage per-form permissions.
//! Every read goes through the single visibility predicate
//! (`Form::is_visible`); every mutation finishes with an audit write.

use crate::models::{
    AddPermissionRequest, AuditAction, AuditEntity, CreateFormRequest, CurrentUser, EntityId,
    Form, FormBasicInfo, FormRoleInfo, RemovePermissionRequest, RoleKind, UserBasicInfo,
};
use crate::services::audit_service::AuditRecorder;
use crate::services::error::CoreError;
use crate::services::role_service::{GrantOutcome, RoleService};
use crate::services::schema_service::SchemaService;
use crate::storage::StorageBackend;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

/// A created form together with its grant list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormWithRoles {
    pub form: Form,
    pub roles: Vec<FormRoleInfo>,
}

/// One entry of the per-user form listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormSummary {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserBasicInfo>,
    /// Grant list; omitted in the administrator listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<FormRoleInfo>>,
    pub submission_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_count: Option<i64>,
}

/// Result of a permission grant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionGrant {
    pub outcome: GrantOutcome,
    pub role: FormRoleInfo,
}

/// Result of a permission removal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionRemoval {
    pub removed: FormRoleInfo,
}

/// Who may manage permissions on a form.
///
/// The source system let any authenticated caller add or remove grants;
/// whether that should require ownership is an open product question, so
/// the choice is a policy knob instead of a hard-coded behavior change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionPolicy {
    /// Any authenticated caller may manage grants (source behavior).
    #[default]
    AnyAuthenticated,
    /// Only a holder of the `owner` role may manage grants.
    OwnerOnly,
}

impl PermissionPolicy {
    /// Read the policy from PERMISSIONS_REQUIRE_OWNER (default: off).
    pub fn from_env() -> Self {
        match std::env::var("PERMISSIONS_REQUIRE_OWNER") {
            Ok(value) if value == "1" || value.eq_ignore_ascii_case("true") => Self::OwnerOnly,
            _ => Self::AnyAuthenticated,
        }
    }
}

/// Form lifecycle manager.
pub struct FormService {
    storage: Arc<dyn StorageBackend>,
    roles: RoleService,
    audit: AuditRecorder,
    permission_policy: PermissionPolicy,
}

impl FormService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            roles: RoleService::new(storage.clone()),
            audit: AuditRecorder::new(storage.clone()),
            storage,
            permission_policy: PermissionPolicy::default(),
        }
    }

    /// Override the permission-management policy.
    pub fn with_permission_policy(mut self, policy: PermissionPolicy) -> Self {
        self.permission_policy = policy;
        self
    }

    /// Create a form: normalize the schema, persist it published, grant the
    /// author the `owner` role, audit.
    pub async fn create(
        &self,
        request: CreateFormRequest,
        author: &CurrentUser,
    ) -> Result<FormWithRoles, CoreError> {
        let form = SchemaService::normalize_form(request, author.id.clone())?;
        self.storage.create_form(&form).await?;

        self.roles
            .grant(&form.id, &author.id, RoleKind::Owner)
            .await?;

        self.audit
            .record(
                AuditAction::Create,
                AuditEntity::Form,
                form.id.as_str(),
                Some(&author.id),
                json!(form),
            )
            .await;

        let roles = self.role_infos(&form.id).await?;
        Ok(FormWithRoles { form, roles })
    }

    /// Find a live form by id. Malformed ids are rejected before storage is
    /// touched; soft-deleted forms are reported absent.
    pub async fn find_by_id(&self, id: &str) -> Result<Form, CoreError> {
        let id = EntityId::parse(id).map_err(|_| CoreError::invalid_input("invalid_id"))?;

        self.storage
            .get_form(&id)
            .await?
            .filter(Form::is_visible)
            .ok_or_else(|| CoreError::not_found("form_not_found"))
    }

    /// Find a live, published form by id.
    pub async fn find_published(&self, id: &str) -> Result<Form, CoreError> {
        let form = self.find_by_id(id).await?;
        if !form.is_published {
            return Err(CoreError::not_found("form_not_found"));
        }
        Ok(form)
    }

    /// Public lookup by slug: live and published forms only.
    pub async fn find_by_slug(&self, slug: &str) -> Result<FormBasicInfo, CoreError> {
        self.storage
            .get_form_by_slug(slug)
            .await?
            .filter(|form| form.is_visible() && form.is_published)
            .map(FormBasicInfo::from)
            .ok_or_else(|| CoreError::not_found("form_not_found"))
    }

    /// List forms for the acting user, most recently created first.
    ///
    /// Administrators see every live form with its submission count; other
    /// users see only forms where they hold a grant, annotated with the
    /// grant list and submission/role counts.
    pub async fn list_for_user(&self, user: &CurrentUser) -> Result<Vec<FormSummary>, CoreError> {
        let mut forms: Vec<Form> = if user.is_admin {
            self.storage
                .list_forms()
                .await?
                .into_iter()
                .filter(Form::is_visible)
                .collect()
        } else {
            let mut held = Vec::new();
            for grant in self.roles.roles_for_user(&user.id).await? {
                if let Some(form) = self.storage.get_form(&grant.form_id).await?
                    && form.is_visible()
                {
                    held.push(form);
                }
            }
            held
        };

        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut summaries = Vec::with_capacity(forms.len());
        for form in forms {
            let submission_count = self.storage.count_submissions(&form.id).await?;
            let (roles, role_count) = if user.is_admin {
                (None, None)
            } else {
                let infos = self.role_infos(&form.id).await?;
                let count = infos.len() as i64;
                (Some(infos), Some(count))
            };
            let author = self
                .storage
                .get_user(&form.author_id)
                .await?
                .map(|u| u.basic_info());

            summaries.push(FormSummary {
                id: form.id,
                title: form.title,
                slug: form.slug,
                description: form.description,
                is_published: form.is_published,
                created_at: form.created_at,
                author,
                roles,
                submission_count,
                role_count,
            });
        }
        Ok(summaries)
    }

    /// Soft-delete a form. Only the owner may delete; the row stays in
    /// storage but becomes invisible to every subsequent read.
    pub async fn soft_delete(&self, id: &str, user: &CurrentUser) -> Result<Form, CoreError> {
        let mut form = self.find_by_id(id).await?;

        if !self
            .roles
            .has_role(&form.id, &user.id, RoleKind::Owner)
            .await?
        {
            return Err(CoreError::forbidden("owner_role_required"));
        }

        let now = Utc::now();
        form.deleted_at = Some(now);
        form.updated_at = now;
        self.storage.update_form(&form).await?;

        self.audit
            .record(
                AuditAction::Delete,
                AuditEntity::Form,
                form.id.as_str(),
                Some(&user.id),
                json!(form),
            )
            .await;

        Ok(form)
    }

    /// Grant a role on a form to the user behind `email`. Gated by the
    /// configured [`PermissionPolicy`].
    pub async fn permissions_add(
        &self,
        form_id: &str,
        request: AddPermissionRequest,
        acting: &CurrentUser,
    ) -> Result<PermissionGrant, CoreError> {
        let form = self.find_by_id(form_id).await?;
        self.enforce_permission_policy(&form.id, acting).await?;

        let target = self
            .storage
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| CoreError::not_found("user_not_found"))?;

        let (outcome, grant) = self.roles.grant(&form.id, &target.id, request.role).await?;

        let action = match outcome {
            GrantOutcome::Created => AuditAction::Create,
            GrantOutcome::Updated => AuditAction::Update,
        };
        self.audit
            .record(
                action,
                AuditEntity::FormRole,
                form.id.as_str(),
                Some(&acting.id),
                json!(grant),
            )
            .await;

        Ok(PermissionGrant {
            outcome,
            role: FormRoleInfo {
                user: target.basic_info(),
                role: grant.role,
            },
        })
    }

    /// Revoke the grant held by the user behind `email`. Gated by the
    /// configured [`PermissionPolicy`].
    pub async fn permissions_remove(
        &self,
        form_id: &str,
        request: RemovePermissionRequest,
        acting: &CurrentUser,
    ) -> Result<PermissionRemoval, CoreError> {
        let form = self.find_by_id(form_id).await?;
        self.enforce_permission_policy(&form.id, acting).await?;

        let target = self
            .storage
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| CoreError::not_found("user_not_found"))?;

        let removed = self.roles.revoke(&form.id, &target.id).await?;

        self.audit
            .record(
                AuditAction::Delete,
                AuditEntity::FormRole,
                form.id.as_str(),
                Some(&acting.id),
                json!(removed),
            )
            .await;

        Ok(PermissionRemoval {
            removed: FormRoleInfo {
                user: target.basic_info(),
                role: removed.role,
            },
        })
    }

    async fn enforce_permission_policy(
        &self,
        form_id: &EntityId,
        acting: &CurrentUser,
    ) -> Result<(), CoreError> {
        if self.permission_policy == PermissionPolicy::OwnerOnly
            && !self
                .roles
                .has_role(form_id, &acting.id, RoleKind::Owner)
                .await?
        {
            return Err(CoreError::forbidden("owner_role_required"));
        }
        Ok(())
    }

    /// Grant list annotated with each holder's basic info. Grants whose
    /// user row has been purged are skipped.
    async fn role_infos(&self, form_id: &EntityId) -> Result<Vec<FormRoleInfo>, CoreError> {
        let mut infos = Vec::new();
        for grant in self.roles.roles_for_form(form_id).await? {
            if let Some(user) = self.storage.get_user(&grant.user_id).await? {
                infos.push(FormRoleInfo {
                    user: user.basic_info(),
                    role: grant.role,
                });
            }
        }
        Ok(infos)
    }
}
