//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the StorageBackend
//! trait. Embedded documents (questions, answers, audit detail) are stored
//! as JSONB columns; grant uniqueness is enforced by the primary key on
//! (form_id, user_id) with an upsert.

use super::{StorageError, traits::StorageBackend};
use crate::models::{AuditEntry, EntityId, Form, FormRole, FormSubmission, User};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQL storage backend implementation.
pub struct PostgresStorageBackend {
    pool: PgPool,
}

impl PostgresStorageBackend {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(connection_err)?;
        }
        Ok(())
    }
}

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        name        TEXT NOT NULL,
        last_name   TEXT,
        is_admin    BOOLEAN NOT NULL DEFAULT FALSE,
        is_active   BOOLEAN NOT NULL DEFAULT TRUE,
        created_at  TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS forms (
        id           TEXT PRIMARY KEY,
        title        TEXT NOT NULL,
        slug         TEXT NOT NULL UNIQUE,
        description  TEXT,
        questions    JSONB NOT NULL,
        is_published BOOLEAN NOT NULL,
        author_id    TEXT NOT NULL REFERENCES users(id),
        deleted_at   TIMESTAMPTZ,
        created_at   TIMESTAMPTZ NOT NULL,
        updated_at   TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_roles (
        form_id    TEXT NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
        user_id    TEXT NOT NULL REFERENCES users(id),
        role       TEXT NOT NULL,
        granted_at TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (form_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_submissions (
        id         TEXT PRIMARY KEY,
        form_id    TEXT NOT NULL REFERENCES forms(id),
        answers    JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_entries (
        id         TEXT PRIMARY KEY,
        action     TEXT NOT NULL,
        entity     TEXT NOT NULL,
        entity_id  TEXT NOT NULL,
        user_id    TEXT,
        detail     JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

fn connection_err(e: sqlx::Error) -> StorageError {
    StorageError::ConnectionError(e.to_string())
}

/// Map a sqlx error, translating unique violations into `Duplicate`.
fn write_err(e: sqlx::Error, entity_type: &str, field: &str) -> StorageError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StorageError::Duplicate {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
        };
    }
    connection_err(e)
}

fn entity_id(row: &PgRow, column: &str) -> Result<EntityId, StorageError> {
    let raw: String = row.try_get(column).map_err(connection_err)?;
    EntityId::parse(&raw).map_err(|e| StorageError::Other(e.to_string()))
}

fn user_from_row(row: &PgRow) -> Result<User, StorageError> {
    Ok(User {
        id: entity_id(row, "id")?,
        email: row.try_get("email").map_err(connection_err)?,
        name: row.try_get("name").map_err(connection_err)?,
        last_name: row.try_get("last_name").map_err(connection_err)?,
        is_admin: row.try_get("is_admin").map_err(connection_err)?,
        is_active: row.try_get("is_active").map_err(connection_err)?,
        created_at: row.try_get("created_at").map_err(connection_err)?,
    })
}

fn form_from_row(row: &PgRow) -> Result<Form, StorageError> {
    let questions: serde_json::Value = row.try_get("questions").map_err(connection_err)?;
    Ok(Form {
        id: entity_id(row, "id")?,
        title: row.try_get("title").map_err(connection_err)?,
        slug: row.try_get("slug").map_err(connection_err)?,
        description: row.try_get("description").map_err(connection_err)?,
        questions: serde_json::from_value(questions)
            .map_err(|e| StorageError::Other(format!("corrupt questions document: {}", e)))?,
        is_published: row.try_get("is_published").map_err(connection_err)?,
        author_id: entity_id(row, "author_id")?,
        deleted_at: row.try_get("deleted_at").map_err(connection_err)?,
        created_at: row.try_get("created_at").map_err(connection_err)?,
        updated_at: row.try_get("updated_at").map_err(connection_err)?,
    })
}

fn role_from_row(row: &PgRow) -> Result<FormRole, StorageError> {
    let role: String = row.try_get("role").map_err(connection_err)?;
    Ok(FormRole {
        form_id: entity_id(row, "form_id")?,
        user_id: entity_id(row, "user_id")?,
        role: serde_json::from_value(serde_json::Value::String(role))
            .map_err(|e| StorageError::Other(format!("unknown role kind: {}", e)))?,
        granted_at: row.try_get("granted_at").map_err(connection_err)?,
    })
}

fn submission_from_row(row: &PgRow) -> Result<FormSubmission, StorageError> {
    let answers: serde_json::Value = row.try_get("answers").map_err(connection_err)?;
    Ok(FormSubmission {
        id: entity_id(row, "id")?,
        form_id: entity_id(row, "form_id")?,
        answers: serde_json::from_value(answers)
            .map_err(|e| StorageError::Other(format!("corrupt answers document: {}", e)))?,
        created_at: row.try_get("created_at").map_err(connection_err)?,
    })
}

#[async_trait]
impl StorageBackend for PostgresStorageBackend {
    async fn get_user(&self, id: &EntityId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            "SELECT id, email, name, last_name, is_admin, is_active, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            "SELECT id, email, name, last_name, is_admin, is_active, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_err)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, last_name, is_admin, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_err(e, "user", "email"))?;

        Ok(())
    }

    async fn create_form(&self, form: &Form) -> Result<(), StorageError> {
        let questions = serde_json::to_value(&form.questions)
            .map_err(|e| StorageError::Other(e.to_string()))?;

        sqlx::query(
            "INSERT INTO forms (id, title, slug, description, questions, is_published, \
             author_id, deleted_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(form.id.as_str())
        .bind(&form.title)
        .bind(&form.slug)
        .bind(&form.description)
        .bind(questions)
        .bind(form.is_published)
        .bind(form.author_id.as_str())
        .bind(form.deleted_at)
        .bind(form.created_at)
        .bind(form.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_err(e, "form", "slug"))?;

        Ok(())
    }

    async fn get_form(&self, id: &EntityId) -> Result<Option<Form>, StorageError> {
        let row = sqlx::query("SELECT * FROM forms WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_err)?;

        row.as_ref().map(form_from_row).transpose()
    }

    async fn get_form_by_slug(&self, slug: &str) -> Result<Option<Form>, StorageError> {
        let row = sqlx::query("SELECT * FROM forms WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(connection_err)?;

        row.as_ref().map(form_from_row).transpose()
    }

    async fn list_forms(&self) -> Result<Vec<Form>, StorageError> {
        let rows = sqlx::query("SELECT * FROM forms ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(connection_err)?;

        rows.iter().map(form_from_row).collect()
    }

    async fn update_form(&self, form: &Form) -> Result<(), StorageError> {
        let questions = serde_json::to_value(&form.questions)
            .map_err(|e| StorageError::Other(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE forms SET title = $2, slug = $3, description = $4, questions = $5, \
             is_published = $6, deleted_at = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(form.id.as_str())
        .bind(&form.title)
        .bind(&form.slug)
        .bind(&form.description)
        .bind(questions)
        .bind(form.is_published)
        .bind(form.deleted_at)
        .bind(form.updated_at)
        .execute(&self.pool)
        .await
        .map_err(connection_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "form".to_string(),
                entity_id: form.id.to_string(),
            });
        }
        Ok(())
    }

    async fn upsert_form_role(&self, role: &FormRole) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO form_roles (form_id, user_id, role, granted_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (form_id, user_id) \
             DO UPDATE SET role = EXCLUDED.role, granted_at = EXCLUDED.granted_at",
        )
        .bind(role.form_id.as_str())
        .bind(role.user_id.as_str())
        .bind(role.role.to_string())
        .bind(role.granted_at)
        .execute(&self.pool)
        .await
        .map_err(connection_err)?;

        Ok(())
    }

    async fn get_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<Option<FormRole>, StorageError> {
        let row = sqlx::query(
            "SELECT form_id, user_id, role, granted_at FROM form_roles \
             WHERE form_id = $1 AND user_id = $2",
        )
        .bind(form_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(connection_err)?;

        row.as_ref().map(role_from_row).transpose()
    }

    async fn list_roles_for_form(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormRole>, StorageError> {
        let rows = sqlx::query(
            "SELECT form_id, user_id, role, granted_at FROM form_roles \
             WHERE form_id = $1 ORDER BY granted_at",
        )
        .bind(form_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(connection_err)?;

        rows.iter().map(role_from_row).collect()
    }

    async fn list_roles_for_user(
        &self,
        user_id: &EntityId,
    ) -> Result<Vec<FormRole>, StorageError> {
        let rows = sqlx::query(
            "SELECT form_id, user_id, role, granted_at FROM form_roles \
             WHERE user_id = $1 ORDER BY granted_at",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(connection_err)?;

        rows.iter().map(role_from_row).collect()
    }

    async fn delete_form_role(
        &self,
        form_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM form_roles WHERE form_id = $1 AND user_id = $2")
            .bind(form_id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(connection_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_submission(&self, submission: &FormSubmission) -> Result<(), StorageError> {
        let answers = serde_json::to_value(&submission.answers)
            .map_err(|e| StorageError::Other(e.to_string()))?;

        sqlx::query(
            "INSERT INTO form_submissions (id, form_id, answers, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(submission.id.as_str())
        .bind(submission.form_id.as_str())
        .bind(answers)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await
        .map_err(connection_err)?;

        Ok(())
    }

    async fn list_submissions(
        &self,
        form_id: &EntityId,
    ) -> Result<Vec<FormSubmission>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, form_id, answers, created_at FROM form_submissions \
             WHERE form_id = $1 ORDER BY created_at",
        )
        .bind(form_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(connection_err)?;

        rows.iter().map(submission_from_row).collect()
    }

    async fn count_submissions(&self, form_id: &EntityId) -> Result<i64, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM form_submissions WHERE form_id = $1")
                .bind(form_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(connection_err)?;

        Ok(count)
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StorageError> {
        let action = serde_json::to_value(entry.action)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let entity = serde_json::to_value(entry.entity)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        sqlx::query(
            "INSERT INTO audit_entries (id, action, entity, entity_id, user_id, detail, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.id.as_str())
        .bind(action)
        .bind(entity)
        .bind(&entry.entity_id)
        .bind(entry.user_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(&entry.detail)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(connection_err)?;

        Ok(())
    }
}
