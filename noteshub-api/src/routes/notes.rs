/// Note endpoints
///
/// Tenant-scoped note CRUD. Every query is scoped to the principal's tenant,
/// so a note in another tenant is indistinguishable from a missing one and
/// comes back 404. Within a tenant, admins see every note while members see
/// only their own.
///
/// # Endpoints
///
/// - `GET /api/notes` - List notes (admin: all in tenant, member: own)
/// - `GET /api/notes/:id` - Fetch one note
/// - `POST /api/notes` - Create a note (free plan enforces the quota)
/// - `PUT /api/notes/:id` - Update title and/or content
/// - `DELETE /api/notes/:id` - Delete a note

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use noteshub_shared::{
    models::{
        note::{CreateNote, Note, UpdateNote},
        tenant::Tenant,
    },
    policy::{self, Principal},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::auth::MessageResponse;

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Note title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Note content
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Update note request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New content
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
}

/// Lists notes visible to the principal, most recently updated first
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Note>>> {
    let notes = if principal.is_admin() {
        Note::list_by_tenant(&state.db, principal.tenant_id).await?
    } else {
        Note::list_by_author(&state.db, principal.tenant_id, principal.user_id).await?
    };

    Ok(Json(notes))
}

/// Fetches a single note
///
/// # Errors
///
/// - `403 Forbidden`: The note belongs to another member of the tenant
/// - `404 Not Found`: No such note in the principal's tenant
pub async fn get_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Note>> {
    let note = fetch_visible_note(&state, &principal, id).await?;
    Ok(Json(note))
}

/// Creates a note
///
/// On the free plan, creation is denied once the tenant holds its quota of
/// notes. The count is read immediately before the insert; a concurrent
/// create racing past the boundary may land one note over quota, which is
/// acceptable for a soft limit.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Free-plan quota exhausted
/// - `404 Not Found`: The tenant no longer exists
pub async fn create_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    req.validate()?;

    let tenant = Tenant::find_by_id(&state.db, principal.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    let note_count = Note::count_by_tenant(&state.db, principal.tenant_id).await?;
    policy::check_note_quota(&tenant, note_count)?;

    let note = Note::create(
        &state.db,
        CreateNote {
            title: req.title,
            content: req.content,
            tenant_id: principal.tenant_id,
            author_id: principal.user_id,
            author_email: principal.email.clone(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Updates a note's title and/or content
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: The note belongs to another member of the tenant
/// - `404 Not Found`: No such note in the principal's tenant
pub async fn update_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    req.validate()?;

    // Visibility check before the write
    fetch_visible_note(&state, &principal, id).await?;

    let note = Note::update_in_tenant(
        &state.db,
        id,
        principal.tenant_id,
        UpdateNote {
            title: req.title,
            content: req.content,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Deletes a note
///
/// # Errors
///
/// - `403 Forbidden`: The note belongs to another member of the tenant
/// - `404 Not Found`: No such note in the principal's tenant
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    fetch_visible_note(&state, &principal, id).await?;

    let deleted = Note::delete_in_tenant(&state.db, id, principal.tenant_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Note deleted successfully".to_string(),
    }))
}

/// Loads a note the principal may act on
///
/// Cross-tenant notes surface as 404 (the lookup is tenant-scoped); a note
/// owned by a different member of the same tenant surfaces as 403.
async fn fetch_visible_note(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
) -> Result<Note, ApiError> {
    let note = Note::find_in_tenant(&state.db, id, principal.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    if !policy::can_access_note(principal, &note) {
        return Err(ApiError::Forbidden(
            "Unauthorized access to note".to_string(),
        ));
    }

    Ok(note)
}
