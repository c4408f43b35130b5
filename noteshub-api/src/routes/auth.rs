/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (tenant derived from the email domain)
/// - Login
/// - Logout (client-side token discard; the token stays valid until expiry)
/// - Current user and current tenant lookups
///
/// # Endpoints
///
/// - `POST /api/register` - Register new user
/// - `POST /api/login` - Login and get a token
/// - `POST /api/logout` - Logout
/// - `GET /api/user` - Current principal
/// - `GET /api/user/tenant` - Current principal's tenant

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use noteshub_shared::{
    auth::{jwt, password},
    models::{
        tenant::Tenant,
        user::{CreateUser, User, UserRole},
    },
    policy::Principal,
    tenancy,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address; the domain determines the tenant
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The registered or authenticated user (password hash omitted)
    pub user: User,

    /// Bearer token, valid for 7 days
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Register a new user
///
/// The tenant is resolved from the email domain and created on first sight
/// with the free plan. Every self-registered user gets the `member` role;
/// admins are provisioned out of band.
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// {
///   "email": "user@acme.test",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, unknown domain in strict mode,
///   or the email is already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let tenant =
        tenancy::resolve_tenant_for_email(&state.db, &state.tenancy_config(), &req.email).await?;

    let password_hash = password::hash_password(&req.password)?;

    // The unique index on email catches a concurrent duplicate registration
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            role: UserRole::Member,
            tenant_id: tenant.id,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login endpoint
///
/// Authenticates a user and returns a bearer token.
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// {
///   "email": "user@acme.test",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password; the response is
///   identical in both cases so callers cannot enumerate accounts
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse { user, token }))
}

/// Logout endpoint
///
/// Tokens are stateless, so logout is a client-side token discard; an
/// already-issued token remains valid until it expires.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Returns the authenticated principal
///
/// # Endpoint
///
/// ```text
/// GET /api/user
/// Authorization: Bearer <token>
/// ```
pub async fn current_user(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}

/// Returns the authenticated principal's tenant
///
/// # Errors
///
/// - `404 Not Found`: The tenant no longer exists
pub async fn current_tenant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Tenant>> {
    let tenant = Tenant::find_by_id(&state.db, principal.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    Ok(Json(tenant))
}
