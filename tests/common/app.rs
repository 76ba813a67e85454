//! Router harness
//!
//! Drives the full router (middleware, fallback and layers included) with
//! `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use despacho::backend::ai::AiClient;
use despacho::backend::mail::Mailer;
use despacho::backend::routes::create_router;
use despacho::backend::server::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use super::auth_helpers::auth_header;
use super::database::create_test_pool;

/// A router backed by a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Database only; mail and AI unconfigured
    pub async fn new() -> Self {
        Self::with_services(None, None).await
    }

    pub async fn with_services(mailer: Option<Mailer>, ai_client: Option<AiClient>) -> Self {
        let pool = create_test_pool().await;
        let state = AppState::new(Some(pool.clone()), mailer, ai_client);
        Self {
            router: create_router(state, "*"),
            pool,
        }
    }

    /// Send a request and return the status with the parsed JSON body
    ///
    /// An empty body comes back as `Value::Null`; a non-JSON body as a
    /// `Value::String`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, auth_header(token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
