/// Note model and database operations
///
/// This module provides the Note model and tenant-scoped CRUD operations.
/// Every query that touches a single note filters on both the note ID and
/// the tenant ID, so a note from another tenant is indistinguishable from a
/// missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     content TEXT NOT NULL,
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     author_email VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Note model representing a text note
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID (UUID v4)
    pub id: Uuid,

    /// Title (at most 200 characters)
    pub title: String,

    /// Body text (at most 10000 characters)
    pub content: String,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// User who created the note
    pub author_id: Uuid,

    /// Author's email at creation time (denormalized for display)
    pub author_email: String,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    /// Title
    pub title: String,

    /// Body text
    pub content: String,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Authoring user
    pub author_id: Uuid,

    /// Author's email
    pub author_email: String,
}

/// Input for updating an existing note
///
/// Only non-None fields are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    /// New title
    pub title: Option<String>,

    /// New body text
    pub content: Option<String>,
}

impl Note {
    /// Creates a new note in the database
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, content, tenant_id, author_id, author_email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, tenant_id, author_id, author_email,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.tenant_id)
        .bind(data.author_id)
        .bind(data.author_email)
        .fetch_one(pool)
        .await?;

        Ok(note)
    }

    /// Finds a note by ID within a tenant
    ///
    /// Returns None for notes that exist but belong to another tenant.
    pub async fn find_in_tenant(
        pool: &PgPool,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tenant_id, author_id, author_email,
                   created_at, updated_at
            FROM notes
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Lists all notes for a tenant, most recently updated first
    pub async fn list_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tenant_id, author_id, author_email,
                   created_at, updated_at
            FROM notes
            WHERE tenant_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Lists a single author's notes within a tenant, most recently updated first
    ///
    /// Used for member-level listings, which only show the caller's own notes.
    pub async fn list_by_author(
        pool: &PgPool,
        tenant_id: Uuid,
        author_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tenant_id, author_id, author_email,
                   created_at, updated_at
            FROM notes
            WHERE tenant_id = $1 AND author_id = $2
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Counts notes for a tenant
    ///
    /// The quota check reads this count immediately before the insert within
    /// the same request handler.
    pub async fn count_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM notes
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates a note's title and/or content within a tenant
    ///
    /// Returns None if the note does not exist in the tenant.
    pub async fn update_in_tenant(
        pool: &PgPool,
        id: Uuid,
        tenant_id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, title, content, tenant_id, author_id, author_email,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Deletes a note within a tenant
    ///
    /// Returns true if a note was deleted.
    pub async fn delete_in_tenant(
        pool: &PgPool,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
