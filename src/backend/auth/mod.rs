//! Authentication Module
//!
//! This module handles user registration, login and JWT session tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → User created → JWT token returned
//! 2. **Login**: username (or email) and password → Credentials verified → JWT token returned
//! 3. **Me**: Bearer token → verified by `middleware::auth` → User info returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs, valid for one shift by default
//! - Invalid credentials return 401 without saying which part was wrong

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{RegisterRequest, LoginRequest, AuthResponse, UserResponse};
pub use handlers::{register, login, get_me};
