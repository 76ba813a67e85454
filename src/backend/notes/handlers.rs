/**
 * Note Template Handlers
 *
 * HTTP handlers for /api/notas. All routes require a bearer token.
 *
 * # Sharing
 *
 * Two users saving the same title and content share one stored template.
 * Editing a shared template gives the editor a private copy; see
 * `db::update_for_user`.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::SqlitePool;

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::notes::db;
use crate::shared::{LinkResponse, NoteInput, NoteTemplate, RemovalResponse};

/// GET /api/notas
pub async fn list_notes(
    State(pool): State<Option<SqlitePool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<NoteTemplate>>, BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;
    Ok(Json(db::list_for_user(&pool, auth.user_id).await?))
}

/// POST /api/notas
///
/// Answers 201 when the template was added to the caller's list and 200 when
/// it was already there.
pub async fn create_note(
    State(pool): State<Option<SqlitePool>>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<NoteInput>,
) -> Result<(StatusCode, Json<LinkResponse<NoteTemplate>>), BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;
    let note = request.normalized()?;

    let (item, created) = db::create_for_user(&pool, auth.user_id, &note).await?;
    tracing::info!("User {} saved template {}", auth.user_id, item.id);

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(LinkResponse { created, item })))
}

/// PUT /api/notas/{id}
///
/// The returned template may carry a different `id` than the one in the
/// path when the edit forked a shared template.
///
/// # Errors
///
/// * `400 Bad Request` - Empty title or oversized content
/// * `404 Not Found` - The caller has no template with this ID
pub async fn update_note(
    State(pool): State<Option<SqlitePool>>,
    AuthUser(auth): AuthUser,
    Path(note_id): Path<i64>,
    ApiJson(request): ApiJson<NoteInput>,
) -> Result<Json<NoteTemplate>, BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;
    let note = request.normalized()?;

    let template = db::update_for_user(&pool, auth.user_id, note_id, &note)
        .await?
        .ok_or_else(|| BackendError::not_found("Template not found"))?;

    Ok(Json(template))
}

/// DELETE /api/notas/{id}
pub async fn delete_note(
    State(pool): State<Option<SqlitePool>>,
    AuthUser(auth): AuthUser,
    Path(note_id): Path<i64>,
) -> Result<Json<RemovalResponse>, BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;

    let outcome = db::delete_for_user(&pool, auth.user_id, note_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Template not found"))?;

    Ok(Json(outcome))
}
