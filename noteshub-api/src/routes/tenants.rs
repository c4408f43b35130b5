/// Tenant endpoints
///
/// # Endpoints
///
/// - `GET /api/tenants/:slug` - Tenant info (own tenant only)
/// - `POST /api/tenants/:slug/upgrade` - Upgrade to the pro plan (admin only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use noteshub_shared::{
    models::tenant::Tenant,
    policy::{self, Principal},
};

/// Returns tenant information
///
/// # Errors
///
/// - `403 Forbidden`: The slug names a tenant other than the principal's
/// - `404 Not Found`: No tenant with this slug
pub async fn get_tenant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Tenant>> {
    let tenant = Tenant::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    if !policy::can_access_tenant(&principal, tenant.id) {
        return Err(ApiError::Forbidden(
            "Unauthorized access to tenant".to_string(),
        ));
    }

    Ok(Json(tenant))
}

/// Upgrades a tenant to the pro plan
///
/// Only an admin of the tenant itself may upgrade it. The transition is
/// one-way and idempotent: upgrading an already-pro tenant succeeds and
/// leaves it pro.
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not an admin, or the slug names another
///   tenant
/// - `404 Not Found`: No tenant with this slug
pub async fn upgrade_tenant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Tenant>> {
    let tenant = Tenant::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    policy::check_upgrade(&principal, &tenant)?;

    let tenant = Tenant::upgrade_to_pro(&state.db, tenant.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    Ok(Json(tenant))
}
