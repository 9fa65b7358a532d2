//! Export projection.
//!
//! Folds a form's schema and its submissions into a tabular representation:
//! one column per schema question, one row per submission. The byte-stream
//! rendering (csv/xlsx) is the caller's concern; this service only supplies
//! columns and rows.

use crate::models::{
    Answer, AuditAction, AuditEntity, CurrentUser, EntityId, QuestionType,
};
use crate::services::audit_service::AuditRecorder;
use crate::services::error::CoreError;
use crate::services::form_service::FormService;
use crate::services::role_service::RoleService;
use crate::storage::StorageBackend;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

/// One column of the projected table, keyed by the question id.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TableColumn {
    pub key: EntityId,
    pub header: String,
}

/// The projected table handed to the tabular-file writer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionTable {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

/// Export projector.
pub struct ExportService {
    storage: Arc<dyn StorageBackend>,
    forms: FormService,
    roles: RoleService,
    audit: AuditRecorder,
}

impl ExportService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            forms: FormService::new(storage.clone()),
            roles: RoleService::new(storage.clone()),
            audit: AuditRecorder::new(storage.clone()),
            storage,
        }
    }

    /// Project a form's submissions into a table. The requester must hold
    /// a role on the form (any role, not necessarily owner). Export is a
    /// sensitive read: every call is audited with the submission set that
    /// was read.
    pub async fn export_table(
        &self,
        form_id: &str,
        requester: &CurrentUser,
    ) -> Result<SubmissionTable, CoreError> {
        let form = self.forms.find_by_id(form_id).await?;

        if !self.roles.any_role(&form.id, &requester.id).await? {
            return Err(CoreError::forbidden("no_role_on_form"));
        }

        let submissions = self.storage.list_submissions(&form.id).await?;

        let columns: Vec<TableColumn> = form
            .questions
            .iter()
            .map(|question| TableColumn {
                key: question.id.clone(),
                header: question.title.clone(),
            })
            .collect();

        let rows = submissions
            .iter()
            .map(|submission| {
                columns
                    .iter()
                    .map(|column| {
                        submission
                            .answers
                            .iter()
                            .find(|answer| answer.question_id == column.key)
                            .map(cell_value)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        self.audit
            .record(
                AuditAction::Export,
                AuditEntity::Form,
                form.id.as_str(),
                Some(&requester.id),
                json!(submissions),
            )
            .await;

        Ok(SubmissionTable { columns, rows })
    }
}

/// Fold one answer into a cell: single-choice answers show the first
/// selected value, checkbox answers join all selected values, free-text
/// answers show the raw scalar.
fn cell_value(answer: &Answer) -> String {
    match answer.question_type {
        QuestionType::Select | QuestionType::Radio => answer
            .values
            .first()
            .map(|option| option.value.clone())
            .unwrap_or_default(),
        QuestionType::Checkbox => answer
            .values
            .iter()
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        QuestionType::ShortText | QuestionType::LongText => answer.value.clone(),
    }
}
