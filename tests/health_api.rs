//! Health check and fallback integration tests

#![cfg(feature = "ssr")]

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health_reports_services() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "ok", "database": true, "mail": false, "ai": false })
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/nada", None, None).await;
    assert_api_error!(response, StatusCode::NOT_FOUND);
}
