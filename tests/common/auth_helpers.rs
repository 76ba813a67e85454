//! Authentication test helpers
//!
//! Provides utilities for creating test users and generating tokens.

use despacho::backend::auth::sessions::create_token;
use despacho::backend::auth::users::create_user;
use sqlx::SqlitePool;

/// Password given to every user made by `create_test_user`
pub const TEST_PASSWORD: &str = "test_password_123";

/// Test user credentials
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Create a test user in the database
///
/// Uses a low bcrypt cost to keep tests fast.
pub async fn create_test_user(pool: &SqlitePool, username: &str) -> TestUser {
    let email = format!("{}@example.com", username);
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).expect("Failed to hash password");

    let user = create_user(pool, username, &email, &password_hash, None)
        .await
        .expect("Failed to create test user");

    let token = create_token(user.id, &user.username).expect("Failed to create test token");

    TestUser {
        id: user.id,
        username: user.username,
        email: user.email,
        password: TEST_PASSWORD.to_string(),
        token,
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
