/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds the optional services a handler may need:
 * - SQLite connection pool
 * - SMTP mailer
 * - Generative-text client
 *
 * Each is `Option<T>`; a missing service makes the handlers that need it
 * answer 503 instead of preventing startup.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the part of
 * the state they use:
 *
 * ```rust
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<Option<SqlitePool>>) {
 *     // ...
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::ai::client::AiClient;
use crate::backend::mail::mailer::Mailer;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// This is `None` if the database could not be opened at startup.
    pub db_pool: Option<SqlitePool>,

    /// Outbound mailer, `None` when SMTP is not configured
    pub mailer: Option<Mailer>,

    /// Text-correction client, `None` when no API key is configured
    pub ai_client: Option<AiClient>,
}

impl AppState {
    pub fn new(
        db_pool: Option<SqlitePool>,
        mailer: Option<Mailer>,
        ai_client: Option<AiClient>,
    ) -> Self {
        Self {
            db_pool,
            mailer,
            ai_client,
        }
    }
}

impl FromRef<AppState> for Option<SqlitePool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Option<Mailer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for Option<AiClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ai_client.clone()
    }
}
