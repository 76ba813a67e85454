//! Despacho - Back-office API for a B2B technical dispatch team
//!
//! # Module Structure
//!
//! - **`shared`** - Request/response types of the REST API
//!   - Applications, note templates, mail and correction payloads
//!   - Validation and shared error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, SQLite persistence, JWT authentication
//!   - SMTP mail and AI text correction
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend module and its dependencies.
//!   Without it only the serde types in `shared` are built, which is enough
//!   for a Rust client.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
