//! Schema normalization for form creation.
//!
//! Turns a client-submitted form definition into the canonical, storable
//! schema: server-generated question/option identifiers, a derived slug,
//! and no empty options. Pure function from request to canonical shape;
//! the only side effect is identifier generation.

use crate::models::{CreateFormRequest, EntityId, Form, Question, QuestionOption};
use crate::services::error::CoreError;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Schema normalizer.
pub struct SchemaService;

impl SchemaService {
    /// Build the canonical form shape from a creation request.
    ///
    /// The resulting slug is not guaranteed collision-free; storage enforces
    /// slug uniqueness and the caller treats a violation as retryable.
    pub fn normalize_form(
        request: CreateFormRequest,
        author_id: EntityId,
    ) -> Result<Form, CoreError> {
        if request.title.trim().is_empty() {
            return Err(CoreError::invalid_input("title_required"));
        }

        let questions = request
            .questions
            .into_iter()
            .map(|question| Question {
                id: EntityId::generate(),
                title: question.title,
                placeholder: question.placeholder,
                is_required: question.is_required,
                question_type: question.question_type,
                order: question.order,
                // Absent options stay absent; present options get fresh keys
                // and lose every empty value.
                options: question.options.map(|options| {
                    options
                        .into_iter()
                        .filter(|option| !option.value.is_empty())
                        .map(|option| QuestionOption {
                            key: EntityId::generate(),
                            value: option.value,
                            order: option.order,
                        })
                        .collect()
                }),
            })
            .collect();

        let now = Utc::now();
        Ok(Form {
            id: EntityId::generate(),
            slug: Self::slugify(&request.title),
            title: request.title,
            description: request.description,
            questions,
            is_published: true,
            author_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Derive a lower-cased URL-safe slug from a title, suffixed with a
    /// short random disambiguator.
    pub fn slugify(title: &str) -> String {
        let lowered = title.to_lowercase();
        let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "-");
        let base = cleaned.trim_matches('-');
        let suffix = EntityId::generate();

        if base.is_empty() {
            suffix.short().to_string()
        } else {
            format!("{}-{}", base, suffix.short())
        }
    }
}
