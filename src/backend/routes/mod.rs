//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - Router assembly, CORS, tracing, fallback
//! └── api_routes.rs   - REST endpoints and the health check
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use despacho::backend::routes::create_router;
//! use despacho::backend::server::state::AppState;
//!
//! let router = create_router(AppState::new(None, None, None), "*");
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
