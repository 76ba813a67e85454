/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed with `JWT_SECRET` and live for `JWT_TTL_HOURS`
 * (default: one 8-hour dispatch shift).
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::backend::error::BackendError;

/// Default token lifetime, in hours
pub const DEFAULT_TTL_HOURS: i64 = 8;

const DEV_SECRET: &str = "despacho-dev-secret-change-in-production";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username at the time of issue
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    static WARNED: OnceLock<()> = OnceLock::new();

    std::env::var("JWT_SECRET")
        .ok()
        .filter(|secret| !secret.is_empty())
        .unwrap_or_else(|| {
            WARNED.get_or_init(|| {
                tracing::warn!("JWT_SECRET not set. Using the development secret.");
            });
            DEV_SECRET.to_string()
        })
}

const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Token lifetime in seconds, from `JWT_TTL_HOURS`
///
/// Values that are not positive or overflow when converted fall back to the
/// default.
fn get_ttl_seconds() -> i64 {
    std::env::var("JWT_TTL_HOURS")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|hours| *hours > 0)
        .and_then(|hours| hours.checked_mul(SECONDS_PER_HOUR))
        .unwrap_or(DEFAULT_TTL_HOURS * SECONDS_PER_HOUR)
}

/// Create a JWT token for a user
pub fn create_token(user_id: i64, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now.saturating_add(get_ttl_seconds());

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// Rejects tokens with a bad signature or an `exp` in the past.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Extract user ID from token
pub fn get_user_id_from_token(token: &str) -> Result<i64, BackendError> {
    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;
    claims.sub.parse::<i64>().map_err(|_| {
        tracing::warn!("Invalid user ID in token: {}", claims.sub);
        BackendError::unauthorized("Invalid or expired token")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_create_and_verify_token() {
        let token = create_token(42, "operador1").unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "operador1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_get_user_id_from_token() {
        let token = create_token(7, "supervisor").unwrap();
        assert_eq!(get_user_id_from_token(&token).unwrap(), 7);
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token("invalid.token.here").is_err());
        assert!(get_user_id_from_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            username: "operador1".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            username: "intruso".to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[test]
    #[serial]
    fn test_ttl_from_env() {
        std::env::set_var("JWT_TTL_HOURS", "2");
        let claims = verify_token(&create_token(1, "operador1").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);

        std::env::set_var("JWT_TTL_HOURS", "not-a-number");
        let claims = verify_token(&create_token(1, "operador1").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_TTL_HOURS * 60 * 60);

        std::env::set_var("JWT_TTL_HOURS", i64::MAX.to_string());
        let claims = verify_token(&create_token(1, "operador1").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_TTL_HOURS * 60 * 60);

        std::env::remove_var("JWT_TTL_HOURS");
    }
}
