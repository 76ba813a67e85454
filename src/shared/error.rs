//! Payload Errors
//!
//! Errors raised while checking a request body, before anything touches the
//! database or an outbound service. A client sharing these types can run the
//! same checks locally.
//!
//! ```rust
//! use despacho::shared::error::SharedError;
//!
//! let error = SharedError::too_long("titulo", 200);
//! assert_eq!(error.field(), "titulo");
//! assert_eq!(error.to_string(), "Field 'titulo' must be at most 200 characters");
//! ```
use thiserror::Error;

/// A request payload failed a check
///
/// Every variant names the offending field; the backend answers 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// The field has an invalid value
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: &'static str,
        message: String,
    },

    /// The field exceeds its length limit (in characters)
    #[error("Field '{field}' must be at most {max} characters")]
    TooLong {
        field: &'static str,
        max: usize,
    },
}

impl SharedError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field,
            message: message.into(),
        }
    }

    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::TooLong { field, max }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::ValidationError { field, .. } | Self::TooLong { field, .. } => field,
        }
    }
}
