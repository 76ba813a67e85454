/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Check that neither the username nor the email is taken
 * 3. Hash password using bcrypt (on the blocking pool)
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::SqlitePool;

use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::handlers::types::{RegisterRequest, AuthResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::shared::SharedError;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate(request: &RegisterRequest) -> Result<(), SharedError> {
    if !is_valid_username(&request.username) {
        return Err(SharedError::validation(
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    let email = request.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(SharedError::validation("email", "Invalid email format")),
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    Ok(())
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username, email or password
/// * `409 Conflict` - Username or email already registered
/// * `503 Service Unavailable` - Database not configured
/// * `500 Internal Server Error` - Hashing, insert or token generation failed
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "operador1",
///   "email": "operador1@example.com",
///   "password": "securepassword123"
/// }
/// ```
pub async fn register(
    State(pool): State<Option<SqlitePool>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let pool = pool.ok_or_else(|| BackendError::unavailable("Database"))?;
    tracing::info!("Register request for username: {}", request.username);

    validate(&request)?;
    let email = request.email.trim().to_string();
    let display_name = request
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::handler(StatusCode::CONFLICT, "Username already taken"));
    }

    if get_user_by_email(&pool, &email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::handler(StatusCode::CONFLICT, "Email already registered"));
    }

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| BackendError::state(format!("Hashing task failed: {}", e)))?
        .map_err(|e| BackendError::state(format!("Failed to hash password: {}", e)))?;

    let user = create_user(&pool, &request.username, &email, &password_hash, display_name).await?;

    let token = create_token(user.id, &user.username)
        .map_err(|e| BackendError::state(format!("Failed to create token: {}", e)))?;

    tracing::info!("User created successfully: {} (id {})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}
