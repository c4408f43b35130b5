/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// user accounts. Every user belongs to exactly one tenant, set at creation
/// and never reassigned; there is no profile editing.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL DEFAULT 'member',
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_role_check CHECK (role IN ('admin', 'member'))
/// );
/// ```
///
/// Emails are stored lowercased so lookups are case-insensitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role a user holds within their tenant
///
/// Admins see every note in the tenant and may upgrade the plan; members
/// see only their own notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Tenant administrator
    Admin,

    /// Regular member
    Member,
}

impl UserRole {
    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }

    /// Parses role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "member" => Some(UserRole::Member),
            _ => None,
        }
    }
}

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (stored lowercase, unique)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role within the tenant ("admin" or "member")
    pub role: String,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// When the user account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Gets the parsed role enum
    pub fn get_role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (lowercased before storage)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Role within the tenant
    pub role: UserRole,

    /// Owning tenant
    pub tenant_id: Uuid,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role, tenant_id)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING id, email, password_hash, role, tenant_id, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .bind(data.tenant_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, tenant_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, tenant_id, created_at
            FROM users
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
