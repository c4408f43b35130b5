/// Email-domain to tenant resolution
///
/// Users are grouped into tenants by the domain of their email address.
/// A handful of known organizations map to canonical slugs; other domains
/// either auto-provision a tenant from the domain's first label or, in
/// strict mode, are rejected outright.
///
/// Resolution is idempotent: repeated registrations for the same domain
/// resolve to the same tenant, and the underlying insert is conflict-safe
/// so concurrent first registrations cannot create duplicates.
///
/// # Example
///
/// ```
/// use noteshub_shared::tenancy::{derive_tenant_identity, TenancyConfig};
///
/// let config = TenancyConfig::default();
///
/// let known = derive_tenant_identity("admin@acme.test", &config).unwrap();
/// assert_eq!(known.slug, "acme");
/// assert_eq!(known.name, "Acme Corporation");
///
/// let unknown = derive_tenant_identity("ops@initech.example", &config).unwrap();
/// assert_eq!(unknown.slug, "initech");
/// assert_eq!(unknown.name, "Initech Corporation");
/// ```

use sqlx::PgPool;

use crate::models::tenant::{CreateTenant, Tenant, TenantPlan};

/// Domains with a canonical slug and display name.
const KNOWN_ORGANIZATIONS: &[(&str, &str, &str)] = &[
    ("acme.test", "acme", "Acme Corporation"),
    ("globex.test", "globex", "Globex Corporation"),
];

/// Error type for tenant resolution
#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    /// Email has no domain part, or the domain is not recognized in strict mode
    #[error("Invalid email domain: {0}")]
    InvalidDomain(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Tenant resolution configuration
#[derive(Debug, Clone, Default)]
pub struct TenancyConfig {
    /// When true, registrations from domains outside the known-organization
    /// mapping are rejected instead of auto-provisioning a tenant.
    pub strict_domains: bool,
}

/// Slug and display name derived from an email domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantIdentity {
    /// Unique tenant slug
    pub slug: String,

    /// Display name
    pub name: String,
}

/// Derives the tenant slug and name for an email address
///
/// Known domains map to their canonical identity. Otherwise the slug is the
/// domain's first label and the name is the capitalized slug plus
/// " Corporation".
///
/// # Errors
///
/// Returns `TenancyError::InvalidDomain` if the email has no usable domain,
/// or if the domain is unrecognized and `strict_domains` is set.
pub fn derive_tenant_identity(
    email: &str,
    config: &TenancyConfig,
) -> Result<TenantIdentity, TenancyError> {
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| TenancyError::InvalidDomain(email.to_string()))?;

    if let Some((_, slug, name)) = KNOWN_ORGANIZATIONS.iter().find(|(d, _, _)| *d == domain) {
        return Ok(TenantIdentity {
            slug: (*slug).to_string(),
            name: (*name).to_string(),
        });
    }

    if config.strict_domains {
        return Err(TenancyError::InvalidDomain(domain));
    }

    let slug = domain
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .ok_or_else(|| TenancyError::InvalidDomain(domain.clone()))?
        .to_string();

    let name = format!("{} Corporation", capitalize(&slug));

    Ok(TenantIdentity { slug, name })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Resolves the tenant for an email address, creating it on first sight
///
/// New tenants start on the free plan with the default quota. Repeated
/// calls for the same domain return the same tenant.
///
/// # Errors
///
/// Returns `TenancyError::InvalidDomain` per [`derive_tenant_identity`],
/// or a database error.
pub async fn resolve_tenant_for_email(
    pool: &PgPool,
    config: &TenancyConfig,
    email: &str,
) -> Result<Tenant, TenancyError> {
    let identity = derive_tenant_identity(email, config)?;

    let tenant = Tenant::find_or_create(
        pool,
        CreateTenant {
            name: identity.name,
            slug: identity.slug,
            plan: TenantPlan::Free,
        },
    )
    .await?;

    Ok(tenant)
}
