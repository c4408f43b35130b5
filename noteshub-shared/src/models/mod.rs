/// Database models for NotesHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, each belonging to exactly one tenant
/// - `tenant`: Organizations for multi-tenancy, with billing plan and note quota
/// - `note`: Text notes, scoped to a tenant and attributed to an author
///
/// # Example
///
/// ```no_run
/// use noteshub_shared::models::tenant::{CreateTenant, Tenant, TenantPlan};
/// use noteshub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let tenant = Tenant::create(
///     &pool,
///     CreateTenant {
///         name: "Acme Corporation".to_string(),
///         slug: "acme".to_string(),
///         plan: TenantPlan::Free,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod note;
pub mod tenant;
pub mod user;
