/// Tenant-scoped authorization and plan-quota policy
///
/// Every role, tenant, and plan check in the system lives here as a pure
/// function over already-fetched data. The functions never perform I/O;
/// handlers orchestrate fetch -> decide -> act, and abort the write entirely
/// when the policy denies. That keeps the policy unit-testable without a
/// database and guarantees no partial writes.
///
/// # Permission Model
///
/// 1. **Tenant Isolation**: a principal only ever sees its own tenant
/// 2. **Note Visibility**: admins see all tenant notes, members only their own
/// 3. **Plan Quota**: free tenants may hold at most `max_notes` notes
/// 4. **Upgrades**: admin-only, and only for the principal's own tenant
///
/// # Example
///
/// ```
/// use noteshub_shared::policy::{check_note_quota, Principal};
/// use noteshub_shared::models::tenant::{Tenant, TenantPlan};
/// # use chrono::Utc;
/// # use uuid::Uuid;
///
/// # let tenant = Tenant {
/// #     id: Uuid::new_v4(),
/// #     name: "Acme Corporation".to_string(),
/// #     slug: "acme".to_string(),
/// #     plan: "free".to_string(),
/// #     max_notes: 3,
/// #     created_at: Utc::now(),
/// #     updated_at: Utc::now(),
/// # };
/// assert!(check_note_quota(&tenant, 2).is_ok());
/// assert!(check_note_quota(&tenant, 3).is_err());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::note::Note;
use crate::models::tenant::{Tenant, TenantPlan};
use crate::models::user::{User, UserRole};

/// Error type for policy decisions
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Principal's tenant does not match the target resource's tenant
    #[error("Unauthorized access to tenant")]
    TenantMismatch,

    /// Principal lacks the required role
    #[error("Insufficient permissions: requires {required:?}")]
    InsufficientRole {
        /// Minimum role the operation requires
        required: UserRole,
    },

    /// Free-plan note quota exhausted
    #[error("Free plan limited to {limit} notes. Upgrade to Pro for unlimited notes.")]
    QuotaExceeded {
        /// The tenant's quota at decision time
        limit: i32,
    },
}

/// Authenticated identity derived from a verified bearer token
///
/// Role and tenant are re-derived from storage on every request rather than
/// trusted from token claims, so a token issued before a role change cannot
/// carry stale authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// User's email
    pub email: String,

    /// Role within the tenant ("admin" or "member")
    pub role: UserRole,

    /// The tenant this principal belongs to
    pub tenant_id: Uuid,
}

impl Principal {
    /// Builds a principal from a freshly fetched user row
    ///
    /// Unknown role strings fall back to `Member`, the least-privileged role.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.get_role().unwrap_or(UserRole::Member),
            tenant_id: user.tenant_id,
        }
    }

    /// Returns true if the principal is a tenant admin
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Checks whether a principal may access a tenant-level resource
///
/// Allowed iff the principal's tenant equals the target tenant. Gates
/// tenant-info reads and plan upgrades. Fails closed on any mismatch.
pub fn can_access_tenant(principal: &Principal, target_tenant_id: Uuid) -> bool {
    principal.tenant_id == target_tenant_id
}

/// Checks whether a principal may read or mutate a note
///
/// Requires the note to belong to the principal's tenant. Within the tenant,
/// admins see every note; members only their own.
pub fn can_access_note(principal: &Principal, note: &Note) -> bool {
    if principal.tenant_id != note.tenant_id {
        return false;
    }

    principal.is_admin() || principal.user_id == note.author_id
}

/// Checks whether a tenant's plan permits creating one more note
///
/// Allowed iff the plan is pro (unbounded) or the current count is below
/// `max_notes`. The caller reads the count immediately before this check and
/// inserts immediately after; a race between two creations at exactly the
/// boundary may admit one note over quota, which is acceptable for a soft
/// UX limit.
///
/// # Errors
///
/// Returns `PolicyError::QuotaExceeded` when the quota is exhausted.
pub fn check_note_quota(tenant: &Tenant, current_note_count: i64) -> Result<(), PolicyError> {
    if tenant.get_plan() == Some(TenantPlan::Pro) {
        return Ok(());
    }

    if current_note_count >= i64::from(tenant.max_notes) {
        return Err(PolicyError::QuotaExceeded {
            limit: tenant.max_notes,
        });
    }

    Ok(())
}

/// Checks whether a principal may upgrade a tenant's plan
///
/// Allowed iff the principal is an admin of that exact tenant. Upgrading an
/// already-pro tenant passes this check; the write itself is a no-op.
///
/// # Errors
///
/// Returns `PolicyError::InsufficientRole` for non-admins and
/// `PolicyError::TenantMismatch` for a foreign tenant.
pub fn check_upgrade(principal: &Principal, tenant: &Tenant) -> Result<(), PolicyError> {
    if !principal.is_admin() {
        return Err(PolicyError::InsufficientRole {
            required: UserRole::Admin,
        });
    }

    if !can_access_tenant(principal, tenant.id) {
        return Err(PolicyError::TenantMismatch);
    }

    Ok(())
}
