/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by username, or by email when the identifier contains `@`
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * Unknown users and wrong passwords produce the same 401, and both pay for a
 * bcrypt verification.
 */
use axum::{
    extract::State,
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::SqlitePool;
use std::sync::OnceLock;

use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::handlers::types::{LoginRequest, AuthResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hash checked when the account does not exist, at the registration cost
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        hash("despacho-unknown-account", DEFAULT_COST).unwrap_or_else(|e| {
            tracing::error!("Failed to build dummy password hash: {}", e);
            String::new()
        })
    })
}

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If database query or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "operador1",
///   "password": "securepassword123"
/// }
/// ```
pub async fn login(
    State(pool): State<Option<SqlitePool>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;
    let identifier = request.username.trim();
    tracing::info!("Login request for: {}", identifier);

    let user = if identifier.contains('@') {
        get_user_by_email(&pool, identifier).await?
    } else {
        get_user_by_username(&pool, identifier).await?
    };

    let password = request.password;
    let password_hash = user.as_ref().map(|u| u.password_hash.clone());
    let valid = tokio::task::spawn_blocking(move || match password_hash {
        Some(password_hash) => verify(password, &password_hash),
        None => {
            let _ = verify(password, dummy_hash());
            Ok(false)
        }
    })
    .await
    .map_err(|e| BackendError::state(format!("Verification task failed: {}", e)))?
    .map_err(|e| BackendError::state(format!("Password verification error: {}", e)))?;

    let user = match user {
        Some(user) if valid => user,
        Some(_) => {
            tracing::warn!("Invalid password for user: {}", identifier);
            return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            tracing::warn!("User not found: {}", identifier);
            return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = create_token(user.id, &user.username)
        .map_err(|e| BackendError::state(format!("Failed to create token: {}", e)))?;

    tracing::info!("User logged in successfully: {} (id {})", user.username, user.id);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
