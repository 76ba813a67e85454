//! Generative-text client for spelling and grammar correction.
//!
//! Talks to the `generateContent` endpoint of the Gemini REST API. The base
//! URL is configurable so tests can point it at a mock server.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::error::BackendError;
use crate::backend::server::config::AiConfig;

/// Instruction sent with every correction request
pub const CORRECTION_PROMPT: &str = "Eres un corrector de textos para un equipo de despacho técnico B2B. \
Corrige únicamente la ortografía, la gramática y la puntuación del texto del usuario. \
No cambies el significado, el tono ni la terminología técnica. \
Conserva los saltos de línea, las listas y el formato. \
Responde solo con el texto corregido, sin explicaciones ni comillas.";

#[derive(Debug, Clone, Error)]
pub enum AiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("empty response")]
    Empty,
}

impl From<AiError> for BackendError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Timeout => BackendError::upstream(
                StatusCode::GATEWAY_TIMEOUT,
                "The correction service did not answer in time",
            ),
            other => BackendError::upstream(
                StatusCode::BAD_GATEWAY,
                format!("Correction service error: {}", other),
            ),
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Transport(e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined and trimmed
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn text_content(role: Option<&str>, text: String) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text }],
    }
}

/// Client for the text-correction endpoint
#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("despacho/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to correct `text`
    ///
    /// `instructions` are appended to the fixed correction prompt.
    pub async fn correct(&self, text: &str, instructions: Option<&str>) -> Result<String, AiError> {
        let mut prompt = CORRECTION_PROMPT.to_string();
        if let Some(extra) = instructions.map(str::trim).filter(|s| !s.is_empty()) {
            prompt.push_str("\nIndicaciones adicionales: ");
            prompt.push_str(extra);
        }

        let request = GenerateRequest {
            system_instruction: text_content(None, prompt),
            contents: vec![text_content(Some("user"), text.to_string())],
            generation_config: GenerationConfig { temperature: 0.2 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!("Correction request failed with {}: {}", status, body);
            return Err(AiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let response = res.json::<GenerateResponse>().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::Serde(e.to_string())
            }
        })?;

        response.text().ok_or(AiError::Empty)
    }
}
