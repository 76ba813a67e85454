/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * 1. API routes (public and protected)
 * 2. JSON 404 fallback
 * 3. CORS for the web frontend
 * 4. Request tracing
 */

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::error_response;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Build the CORS layer for the configured frontend origin
///
/// `*` allows any origin. An origin that is not a valid header value is
/// logged and no cross-origin requests are allowed.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!("Invalid CORS origin {:?}: {}", origin, e);
                return CorsLayer::new();
            }
        }
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    if origin.trim() == "*" {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Router<()> {
    let router = configure_api_routes(Router::new(), app_state.clone());

    router
        .fallback(|| async { error_response(StatusCode::NOT_FOUND, "Not found") })
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
