/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading, optional service construction and route
 * configuration.
 *
 * # Initialization Process
 *
 * 1. Open the database and apply migrations
 * 2. Build the mailer if SMTP is configured
 * 3. Build the correction client if an API key is configured
 * 4. Create and configure the router
 *
 * Every step may fail without aborting startup; the affected endpoints
 * answer 503 instead.
 */

use axum::Router;

use crate::backend::ai::AiClient;
use crate::backend::mail::Mailer;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Build the application state from configuration
pub async fn build_state(config: &ServerConfig) -> AppState {
    let db_pool = load_database(&config.database_url).await;

    let mailer = config.mail.as_ref().and_then(|mail| match Mailer::from_config(mail) {
        Ok(mailer) => Some(mailer),
        Err(e) => {
            tracing::error!("Failed to set up mail transport: {}", e);
            None
        }
    });
    if mailer.is_none() {
        tracing::warn!("Mail is not configured. /api/mail/send will answer 503.");
    }

    let ai_client = config.ai.as_ref().and_then(|ai| match AiClient::new(ai) {
        Ok(client) => {
            tracing::info!("AI correction enabled with model {}", ai.model);
            Some(client)
        }
        Err(e) => {
            tracing::error!("Failed to set up AI client: {}", e);
            None
        }
    });
    if ai_client.is_none() {
        tracing::warn!("AI correction is not configured. /api/ai/correct will answer 503.");
    }

    AppState::new(db_pool, mailer, ai_client)
}

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing Despacho backend server");

    let app_state = build_state(config).await;
    let app = create_router(app_state, &config.cors_origin);

    tracing::info!("Router configured");
    app
}
