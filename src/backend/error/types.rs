/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests:
 * - Missing or invalid credentials
 * - Unknown resources
 * - Optional services that are not configured
 *
 * ## Database Errors
 *
 * Wrapped `sqlx::Error`s. Unique-constraint violations surface as
 * 409 Conflict; everything else is a 500 with a generic message, the details
 * only go to the log.
 *
 * ## Upstream Errors
 *
 * Failures of outbound calls (SMTP relay, generative-text API).
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use despacho::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::NOT_FOUND, "Application not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
///
/// let err = BackendError::unavailable("mail");
/// assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing token, unknown ID)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Internal state error (token signing, hashing, ...)
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The SMTP relay refused or failed to deliver a message
    #[error("Mail error: {message}")]
    MailError {
        message: String,
    },

    /// An outbound API call failed
    #[error("Upstream error: {message}")]
    UpstreamError {
        /// Status returned to our client (502 or 504)
        status: StatusCode,
        message: String,
    },

    /// Shared error (payload validation)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a 404 handler error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Shorthand for a 401 handler error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// A 503 for an optional service that is not configured
    pub fn unavailable(service: &str) -> Self {
        Self::handler(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("{} is not configured", service),
        )
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Create a new mail error
    pub fn mail(message: impl Into<String>) -> Self {
        Self::MailError {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `StateError` - 500 Internal Server Error
    /// - `Database` - 409 for unique violations, 404 for `RowNotFound`, else 500
    /// - `MailError` - 502 Bad Gateway
    /// - `UpstreamError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(err) => match err {
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MailError { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamError { status, .. } => *status,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the client-facing error message
    ///
    /// Database and state errors return a generic message; the full error is
    /// logged when the response is built.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { .. } => "Internal server error".to_string(),
            Self::Database(_) => match self.status_code() {
                StatusCode::CONFLICT => "Resource already exists".to_string(),
                StatusCode::NOT_FOUND => "Resource not found".to_string(),
                _ => "Database error".to_string(),
            },
            Self::MailError { message } => format!("Mail delivery failed: {}", message),
            Self::UpstreamError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            BackendError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            BackendError::state("hash failed").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(BackendError::mail("relay down").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            BackendError::upstream(StatusCode::GATEWAY_TIMEOUT, "timeout").status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            BackendError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BackendError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("url", "bad").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("url"));

        let too_long: BackendError = SharedError::too_long("titulo", 200).into();
        assert_eq!(too_long.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_messages_are_generic() {
        let error = BackendError::state("jsonwebtoken: InvalidKeyFormat");
        assert_eq!(error.message(), "Internal server error");

        let error = BackendError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(error.message(), "Database error");
    }
}
