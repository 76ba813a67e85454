//! JSON bodies of the `/api/auth` endpoints

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;

/// Body of `POST /api/auth/register`
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    /// Plain text; hashed with bcrypt before it reaches `usuarios`
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Body of `POST /api/auth/login`
///
/// `username` may also hold the account's email address.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token plus account, returned on register and login
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public view of an account (no password hash)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
        }
    }
}
