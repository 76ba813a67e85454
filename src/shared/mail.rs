//! Mail Types
//!
//! Request and response bodies for the email utility.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum number of recipients (to + cc) in one message
pub const MAX_RECIPIENTS: usize = 50;

/// Request body for `POST /api/mail/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMailRequest {
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Send the body as `text/html` instead of `text/plain`
    #[serde(default)]
    pub html: bool,
}

impl SendMailRequest {
    /// Non-blank addresses from `to` then `cc`
    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.to
            .iter()
            .chain(&self.cc)
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
    }

    /// Structural checks that do not require parsing addresses
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.to.iter().all(|addr| addr.trim().is_empty()) {
            return Err(SharedError::validation("to", "At least one recipient is required"));
        }
        if self.recipients().count() > MAX_RECIPIENTS {
            return Err(SharedError::validation(
                "to",
                format!("At most {} recipients are allowed", MAX_RECIPIENTS),
            ));
        }
        if self.subject.trim().is_empty() {
            return Err(SharedError::validation("subject", "Subject cannot be empty"));
        }
        // Header injection
        if self.subject.contains('\r') || self.subject.contains('\n') {
            return Err(SharedError::validation("subject", "Subject must be a single line"));
        }
        Ok(())
    }
}

/// Response body for `POST /api/mail/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMailResponse {
    pub sent: bool,
    pub recipients: usize,
}
