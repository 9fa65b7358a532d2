//! Form schema model and the form-creation request shape.

use super::enums::QuestionType;
use super::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A selectable option of a choice-based question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionOption {
    /// Server-generated option key; answers reference it.
    pub key: EntityId,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// One question of a form's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub is_required: bool,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Absent for free-text questions; present (possibly empty after
    /// normalization dropped blank values) for choice-based ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,
}

/// A stored form. The embedded question list is the authoritative schema
/// for every future submission against this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Form {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub is_published: bool,
    pub author_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Single visibility predicate for all read paths: a form is visible
    /// as long as it has not been soft-deleted.
    pub fn is_visible(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Public shape returned by the slug lookup. Everything a respondent needs
/// to render and fill the form, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormBasicInfo {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl From<Form> for FormBasicInfo {
    fn from(form: Form) -> Self {
        Self {
            id: form.id,
            title: form.title,
            slug: form.slug,
            description: form.description,
            questions: form.questions,
        }
    }
}

/// Client-submitted option within a form-creation request. The key is
/// ignored; a fresh one is assigned during normalization.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionOptionInput {
    #[serde(default)]
    #[allow(dead_code)]
    pub key: Option<String>,
    pub value: String,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Client-submitted question within a form-creation request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionInput {
    /// Ignored; a fresh server-side id is assigned during normalization.
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    pub is_required: bool,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub options: Option<Vec<QuestionOptionInput>>,
}

/// Form-creation request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFormRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<QuestionInput>,
}

/// Request body for granting a role on a form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddPermissionRequest {
    pub email: String,
    pub role: super::enums::RoleKind,
}

/// Request body for revoking a user's role on a form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemovePermissionRequest {
    pub email: String,
}
