//! Text Correction Types
//!
//! Request and response bodies for AI-assisted text correction.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum accepted input length, in characters
pub const MAX_TEXT_LEN: usize = 10_000;

/// Maximum length of the optional extra instructions
pub const MAX_INSTRUCTIONS_LEN: usize = 500;

/// Request body for `POST /api/ai/correct`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub text: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl CorrectionRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.text.trim().is_empty() {
            return Err(SharedError::validation("text", "Text cannot be empty"));
        }
        if self.text.chars().count() > MAX_TEXT_LEN {
            return Err(SharedError::too_long("text", MAX_TEXT_LEN));
        }
        if let Some(instructions) = &self.instructions {
            if instructions.chars().count() > MAX_INSTRUCTIONS_LEN {
                return Err(SharedError::too_long("instructions", MAX_INSTRUCTIONS_LEN));
            }
        }
        Ok(())
    }
}

/// Response body for `POST /api/ai/correct`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorrectionResponse {
    pub corrected: String,
    /// Model that produced the correction
    pub model: String,
}
