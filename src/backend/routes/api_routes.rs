/**
 * API Route Handlers
 *
 * This module defines the REST endpoints of the server.
 *
 * # Routes
 *
 * ## Public
 * - `GET /api/health` - Service status
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 *
 * ## Protected (bearer token)
 * - `GET /api/auth/me` - Current user
 * - `GET|POST /api/aplicativos` - Application list
 * - `GET /api/aplicativos/catalog` - Shared catalog with link counts
 * - `POST /api/aplicativos/{id}/link` - Link an existing application
 * - `DELETE /api/aplicativos/{id}` - Unlink an application
 * - `GET|POST /api/notas` - Note templates
 * - `PUT|DELETE /api/notas/{id}` - Edit or unlink a template
 * - `POST /api/mail/send` - Send an email
 * - `POST /api/ai/correct` - Correct a text
 */

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::backend::ai::correct_text;
use crate::backend::applications::{
    add_application, link_application, list_applications, list_catalog, remove_application,
};
use crate::backend::auth::{get_me, login, register};
use crate::backend::mail::send_mail;
use crate::backend::middleware::auth_middleware;
use crate::backend::notes::{create_note, delete_note, list_notes, update_note};
use crate::backend::server::state::AppState;

/// Body of `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub mail: bool,
    pub ai: bool,
}

/// Report which optional services are available
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db_pool {
        Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
        None => false,
    };

    Json(HealthResponse {
        status: "ok",
        database,
        mail: state.mailer.is_some(),
        ai: state.ai_client.is_some(),
    })
}

/// Routes reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Routes behind `auth_middleware`
///
/// The middleware is attached with `route_layer`, so unknown paths still
/// reach the fallback instead of answering 401.
pub fn protected_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/aplicativos", get(list_applications).post(add_application))
        .route("/api/aplicativos/catalog", get(list_catalog))
        .route("/api/aplicativos/{id}/link", post(link_application))
        .route("/api/aplicativos/{id}", delete(remove_application))
        .route("/api/notas", get(list_notes).post(create_note))
        .route("/api/notas/{id}", axum::routing::put(update_note).delete(delete_note))
        .route("/api/mail/send", post(send_mail))
        .route("/api/ai/correct", post(correct_text))
        .route_layer(from_fn_with_state(app_state, auth_middleware))
}

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    router
        .merge(public_routes())
        .merge(protected_routes(app_state))
}
