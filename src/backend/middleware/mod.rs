//! Middleware Module
//!
//! This module contains HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer-token authentication for protected routes
//! - **`json`** - JSON body extractor whose rejections use the API error body
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use despacho::backend::middleware::{auth_middleware, AuthUser};
//! use despacho::backend::server::AppState;
//!
//! async fn protected(AuthUser(user): AuthUser) -> String {
//!     user.username
//! }
//!
//! # fn example(state: AppState) -> Router {
//! Router::new()
//!     .route("/protected", get(protected))
//!     .route_layer(from_fn_with_state(state.clone(), auth_middleware))
//!     .with_state(state)
//! # }
//! ```

pub mod auth;
pub mod json;

pub use auth::{AuthenticatedUser, AuthUser, auth_middleware, bearer_token};
pub use json::ApiJson;
