//! Backend Module
//!
//! Server-side code for the Despacho back office: an Axum REST API over a
//! SQLite database.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, startup
//! - **`routes`** - Router assembly
//! - **`auth`** - Registration, login, JWT sessions
//! - **`middleware`** - Bearer-token authentication
//! - **`links`** - Shared base/rel table bookkeeping
//! - **`applications`** - Per-user application catalog
//! - **`notes`** - Per-user note templates
//! - **`mail`** - Outbound email
//! - **`ai`** - Text correction through a generative-text API
//! - **`error`** - Backend error type and JSON error responses
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. The error converts into a
//! JSON body `{"error": ..., "status": ...}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Base/rel link bookkeeping
pub mod links;

/// Application catalog
pub mod applications;

/// Note templates
pub mod notes;

/// Email utility
pub mod mail;

/// AI text correction
pub mod ai;

pub use server::create_app;
pub use error::BackendError;
