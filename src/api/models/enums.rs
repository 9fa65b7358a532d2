//! Closed enumerations shared across the data model.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Question type tag. Closed set; unknown tags are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    ShortText,
    LongText,
    Select,
    Radio,
    Checkbox,
}

impl QuestionType {
    /// Whether answers to this question carry a list of selected options
    /// rather than a free-text scalar.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::Radio | QuestionType::Checkbox
        )
    }
}

/// Role a user can hold on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Owner,
    Editor,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleKind::Owner => f.write_str("owner"),
            RoleKind::Editor => f.write_str("editor"),
        }
    }
}

/// Action verb recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Export,
}

/// Entity kind recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AuditEntity {
    Form,
    FormRole,
    FormSubmission,
    User,
}
