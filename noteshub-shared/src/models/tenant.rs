/// Tenant model and database operations
///
/// This module provides the Tenant model for multi-tenant isolation.
/// Every user and every note belongs to exactly one tenant.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     slug VARCHAR(100) NOT NULL UNIQUE,
///     plan VARCHAR(20) NOT NULL DEFAULT 'free',
///     max_notes INT NOT NULL DEFAULT 3,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tenants_plan_check CHECK (plan IN ('free', 'pro'))
/// );
/// ```
///
/// The slug is globally unique and immutable after creation. The plan moves
/// through a single one-way transition: `free -> pro`. Upgrading sets
/// `max_notes` to the unlimited sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Note quota granted to newly created (free) tenants.
pub const FREE_PLAN_MAX_NOTES: i32 = 3;

/// Sentinel for "no quota" on the pro plan.
pub const UNLIMITED_NOTES: i32 = -1;

/// Billing plan tiers
///
/// The plan governs the note-creation quota: `Free` tenants are limited to
/// `max_notes`, `Pro` tenants are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantPlan {
    /// Free plan (quota-limited)
    Free,

    /// Pro plan (unlimited notes)
    Pro,
}

impl TenantPlan {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPlan::Free => "free",
            TenantPlan::Pro => "pro",
        }
    }

    /// Parses plan from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(TenantPlan::Free),
            "pro" => Some(TenantPlan::Pro),
            _ => None,
        }
    }
}

/// Tenant model representing an isolated organization
///
/// Tenants are the top-level entity for multi-tenant isolation. Users and
/// notes reference their tenant by foreign key and are never shared across
/// tenants.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    /// Unique tenant ID (UUID v4)
    pub id: Uuid,

    /// Organization display name
    pub name: String,

    /// Unique, immutable slug (derived from the email domain)
    pub slug: String,

    /// Current billing plan ("free" or "pro")
    pub plan: String,

    /// Maximum number of notes on the free plan; -1 once upgraded
    pub max_notes: i32,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Gets the parsed plan enum
    pub fn get_plan(&self) -> Option<TenantPlan> {
        TenantPlan::from_str(&self.plan)
    }

    /// Returns true once the tenant has been upgraded
    pub fn is_pro(&self) -> bool {
        self.get_plan() == Some(TenantPlan::Pro)
    }
}

/// Input for creating a new tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Organization display name
    pub name: String,

    /// Unique slug
    pub slug: String,

    /// Initial billing plan (defaults to Free)
    #[serde(default = "default_plan")]
    pub plan: TenantPlan,
}

fn default_plan() -> TenantPlan {
    TenantPlan::Free
}

impl Tenant {
    /// Creates a new tenant in the database
    ///
    /// Free tenants get the default quota of [`FREE_PLAN_MAX_NOTES`].
    ///
    /// # Errors
    ///
    /// Returns an error if the slug already exists or the database
    /// connection fails.
    pub async fn create(pool: &PgPool, data: CreateTenant) -> Result<Self, sqlx::Error> {
        let max_notes = match data.plan {
            TenantPlan::Free => FREE_PLAN_MAX_NOTES,
            TenantPlan::Pro => UNLIMITED_NOTES,
        };

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, slug, plan, max_notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, plan, max_notes, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.plan.as_str())
        .bind(max_notes)
        .fetch_one(pool)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, slug, plan, max_notes, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by its unique slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, slug, plan, max_notes, created_at, updated_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by slug, creating it if absent
    ///
    /// The insert uses `ON CONFLICT DO NOTHING` so that two concurrent first
    /// registrations for the same domain resolve to the same tenant row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails.
    pub async fn find_or_create(pool: &PgPool, data: CreateTenant) -> Result<Self, sqlx::Error> {
        if let Some(existing) = Self::find_by_slug(pool, &data.slug).await? {
            return Ok(existing);
        }

        let max_notes = match data.plan {
            TenantPlan::Free => FREE_PLAN_MAX_NOTES,
            TenantPlan::Pro => UNLIMITED_NOTES,
        };

        let inserted = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, slug, plan, max_notes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id, name, slug, plan, max_notes, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(data.plan.as_str())
        .bind(max_notes)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(tenant) => Ok(tenant),
            // Lost the race: another request inserted the row first.
            None => {
                let tenant = Self::find_by_slug(pool, &data.slug).await?;
                tenant.ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    /// Upgrades a tenant to the pro plan
    ///
    /// One-way transition: the quota is set to [`UNLIMITED_NOTES`] and there
    /// is no path back to `free`. Upgrading an already-pro tenant is a no-op
    /// that still returns the tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails; returns `Ok(None)`
    /// if the tenant does not exist.
    pub async fn upgrade_to_pro(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET plan = $2, max_notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, plan, max_notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(TenantPlan::Pro.as_str())
        .bind(UNLIMITED_NOTES)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }

    /// Deletes a tenant by ID
    ///
    /// Cascades to the tenant's users and notes. Used by the test harness
    /// for cleanup.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_plan_as_str() {
        assert_eq!(TenantPlan::Free.as_str(), "free");
        assert_eq!(TenantPlan::Pro.as_str(), "pro");
    }

    #[test]
    fn test_tenant_plan_from_str() {
        assert_eq!(TenantPlan::from_str("free"), Some(TenantPlan::Free));
        assert_eq!(TenantPlan::from_str("pro"), Some(TenantPlan::Pro));
        assert_eq!(TenantPlan::from_str("trial"), None);
        assert_eq!(TenantPlan::from_str(""), None);
    }

    #[test]
    fn test_create_tenant_default_plan() {
        let create: CreateTenant = serde_json::from_str(
            r#"{"name": "Acme Corporation", "slug": "acme"}"#,
        )
        .unwrap();
        assert_eq!(create.plan, TenantPlan::Free);
    }

    #[test]
    fn test_is_pro() {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: "Acme Corporation".to_string(),
            slug: "acme".to_string(),
            plan: "free".to_string(),
            max_notes: FREE_PLAN_MAX_NOTES,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!tenant.is_pro());

        let upgraded = Tenant {
            plan: "pro".to_string(),
            max_notes: UNLIMITED_NOTES,
            ..tenant
        };
        assert!(upgraded.is_pro());
    }

    // Integration tests for database operations live in noteshub-api/tests.
}
