//! Submission model and the submission-creation request shape.

use super::enums::QuestionType;
use super::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One option selected in an answer to a choice-based question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerOption {
    /// Key of the schema option the respondent selected, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

/// A stored answer. Both `value` and `values` are always present after
/// ingestion, regardless of question type, so downstream consumers never
/// have to handle an absent field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    /// Server-generated; never trusted from the client.
    pub id: EntityId,
    pub question_id: EntityId,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    pub value: String,
    pub values: Vec<AnswerOption>,
}

/// One filled-in instance of a form's schema. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormSubmission {
    pub id: EntityId,
    pub form_id: EntityId,
    pub answers: Vec<Answer>,
    pub created_at: DateTime<Utc>,
}

/// Client-submitted answer. `value`/`values` may be absent or null; both
/// are normalized to their empty defaults during ingestion.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnswerInput {
    /// Ignored; a fresh server-side id is assigned during ingestion.
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<String>,
    pub question_id: EntityId,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<AnswerOption>>,
}

/// Submission-creation request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSubmissionRequest {
    pub form_id: String,
    pub answers: Vec<AnswerInput>,
}
