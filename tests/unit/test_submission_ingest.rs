#[cfg(test)]
mod tests {
    use chrono::Utc;
    use forms_api::models::{
        AnswerInput, AnswerOption, AuditAction, AuditEntity, CreateFormRequest,
        CreateSubmissionRequest, CurrentUser, EntityId, QuestionType, User,
    };
    use forms_api::services::{CoreError, FormService, SubmissionService};
    use forms_api::storage::{MemoryStorageBackend, StorageBackend};
    use std::sync::Arc;

    async fn setup() -> (SubmissionService, FormService, Arc<MemoryStorageBackend>, CurrentUser)
    {
        let storage = Arc::new(MemoryStorageBackend::new());
        let user = User {
            id: EntityId::generate(),
            email: "author@example.com".to_string(),
            name: "Author".to_string(),
            last_name: None,
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        };
        storage.create_user(&user).await.unwrap();
        (
            SubmissionService::new(storage.clone()),
            FormService::new(storage.clone()),
            storage,
            CurrentUser::from(&user),
        )
    }

    fn bare_answer(question_id: EntityId) -> AnswerInput {
        AnswerInput {
            id: None,
            question_id,
            question_type: QuestionType::ShortText,
            title: "Color?".to_string(),
            value: None,
            values: None,
        }
    }

    async fn create_form(forms: &FormService, author: &CurrentUser) -> forms_api::models::Form {
        forms
            .create(
                CreateFormRequest {
                    title: "Survey".to_string(),
                    description: None,
                    questions: vec![],
                },
                author,
            )
            .await
            .unwrap()
            .form
    }

    #[tokio::test]
    async fn test_absent_value_and_values_are_normalized_to_defaults() {
        let (submissions, forms, storage, author) = setup().await;
        let form = create_form(&forms, &author).await;

        let stored = submissions
            .submit(CreateSubmissionRequest {
                form_id: form.id.to_string(),
                answers: vec![bare_answer(EntityId::generate())],
            })
            .await
            .unwrap();

        assert_eq!(stored.answers.len(), 1);
        assert_eq!(stored.answers[0].value, "");
        assert!(stored.answers[0].values.is_empty());

        // The same shape is what storage holds.
        let persisted = storage.list_submissions(&form.id).await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0], stored);
    }

    #[tokio::test]
    async fn test_answer_ids_are_server_generated() {
        let (submissions, forms, _storage, author) = setup().await;
        let form = create_form(&forms, &author).await;

        let stored = submissions
            .submit(CreateSubmissionRequest {
                form_id: form.id.to_string(),
                answers: vec![AnswerInput {
                    id: Some("client-answer-id".to_string()),
                    question_id: EntityId::generate(),
                    question_type: QuestionType::Checkbox,
                    title: "Toppings?".to_string(),
                    value: None,
                    values: Some(vec![AnswerOption {
                        key: None,
                        value: "Cheese".to_string(),
                    }]),
                }],
            })
            .await
            .unwrap();

        assert_ne!(stored.answers[0].id.as_str(), "client-answer-id");
        assert_eq!(stored.answers[0].values[0].value, "Cheese");
    }

    #[tokio::test]
    async fn test_submitting_to_an_unpublished_form_fails() {
        let (submissions, forms, storage, author) = setup().await;
        let mut form = create_form(&forms, &author).await;

        form.is_published = false;
        storage.update_form(&form).await.unwrap();

        let result = submissions
            .submit(CreateSubmissionRequest {
                form_id: form.id.to_string(),
                answers: vec![bare_answer(EntityId::generate())],
            })
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert!(storage.list_submissions(&form.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submitting_to_a_soft_deleted_form_fails() {
        let (submissions, forms, storage, author) = setup().await;
        let form = create_form(&forms, &author).await;

        forms.soft_delete(form.id.as_str(), &author).await.unwrap();

        let result = submissions
            .submit(CreateSubmissionRequest {
                form_id: form.id.to_string(),
                answers: vec![bare_answer(EntityId::generate())],
            })
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert!(storage.list_submissions(&form.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_form_id_is_rejected_before_storage() {
        let (submissions, _forms, _storage, _author) = setup().await;

        let result = submissions
            .submit(CreateSubmissionRequest {
                form_id: "garbage".to_string(),
                answers: vec![],
            })
            .await;
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ingestion_is_audited_as_anonymous() {
        let (submissions, forms, storage, author) = setup().await;
        let form = create_form(&forms, &author).await;

        let stored = submissions
            .submit(CreateSubmissionRequest {
                form_id: form.id.to_string(),
                answers: vec![],
            })
            .await
            .unwrap();

        let audit = storage.audit_entries().await;
        let last = audit.last().unwrap();
        assert_eq!(last.action, AuditAction::Create);
        assert_eq!(last.entity, AuditEntity::FormSubmission);
        assert_eq!(last.entity_id, stored.id.to_string());
        assert!(last.user_id.is_none());
    }
}
