/// Bearer-token authentication middleware
///
/// Validates JWT tokens from the `Authorization: Bearer <token>` header and
/// resolves the caller into a [`Principal`] added to request extensions.
///
/// The token carries only the user id. Role and tenant membership are
/// re-read from the database on every request, so demoting a user or moving
/// them between tenants takes effect immediately instead of when their
/// token expires.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use noteshub_api::app::AppState;
/// use noteshub_api::middleware::auth::jwt_auth;
/// use noteshub_shared::policy::Principal;
///
/// async fn whoami(Extension(principal): Extension<Principal>) -> String {
///     principal.email.clone()
/// }
///
/// fn protected(state: AppState) -> Router<AppState> {
///     Router::new()
///         .route("/user", get(whoami))
///         .layer(middleware::from_fn_with_state(state, jwt_auth))
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use noteshub_shared::auth::jwt::validate_token;
use noteshub_shared::models::user::User;
use noteshub_shared::policy::Principal;

use crate::app::AppState;
use crate::error::ApiError;

/// JWT authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing or not a Bearer token
/// - Token validation fails or the token has expired
/// - The user the token refers to no longer exists
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_string()))?;

    // Parse Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &state.config.jwt.secret)?;

    // Tokens issued before a user was deleted must stop working
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    let principal = Principal::from_user(&user);
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
