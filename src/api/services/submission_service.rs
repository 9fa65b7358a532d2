//! Submission ingestion.
//!
//! Validates an incoming submission against the target form's publication
//! state, normalizes every answer, and persists the submission with all of
//! its answers as one unit.

use crate::models::{
    Answer, AuditAction, AuditEntity, CreateSubmissionRequest, EntityId, FormSubmission,
};
use crate::services::audit_service::AuditRecorder;
use crate::services::error::CoreError;
use crate::services::form_service::FormService;
use crate::storage::StorageBackend;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Submission ingestor.
pub struct SubmissionService {
    storage: Arc<dyn StorageBackend>,
    forms: FormService,
    audit: AuditRecorder,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            forms: FormService::new(storage.clone()),
            audit: AuditRecorder::new(storage.clone()),
            storage,
        }
    }

    /// Ingest one submission against a live, published form.
    ///
    /// Every stored answer carries a fresh server-side id and both `value`
    /// (defaulted to `""`) and `values` (defaulted to `[]`), whatever the
    /// question type. Answer `question_id`s are not cross-checked against
    /// the form's schema, and required questions are not enforced; both
    /// gaps are inherited source behavior, kept on purpose.
    pub async fn submit(
        &self,
        request: CreateSubmissionRequest,
    ) -> Result<FormSubmission, CoreError> {
        let form = self.forms.find_published(&request.form_id).await?;

        let answers: Vec<Answer> = request
            .answers
            .into_iter()
            .map(|answer| Answer {
                id: EntityId::generate(),
                question_id: answer.question_id,
                question_type: answer.question_type,
                title: answer.title,
                value: answer.value.unwrap_or_default(),
                values: answer.values.unwrap_or_default(),
            })
            .collect();

        let submission = FormSubmission {
            id: EntityId::generate(),
            form_id: form.id,
            answers,
            created_at: Utc::now(),
        };
        self.storage.create_submission(&submission).await?;

        // Anonymous action: public endpoint, no acting user to attribute.
        self.audit
            .record(
                AuditAction::Create,
                AuditEntity::FormSubmission,
                submission.id.as_str(),
                None,
                json!(submission),
            )
            .await;

        Ok(submission)
    }
}
