//! Note Template Types
//!
//! Wire types for dispatch note templates ("plantillas"). Template bodies are
//! stored once in `plantillas_base` and shared by every user whose
//! `notas_despacho_rel` row points at them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum title length
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum content length
pub const MAX_CONTENT_LEN: usize = 50_000;

/// A note template as seen by one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteTemplate {
    /// Base template ID
    pub id: i64,
    pub titulo: String,
    pub contenido: String,
    pub categoria: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or editing a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteInput {
    pub titulo: String,
    #[serde(default)]
    pub contenido: String,
    #[serde(default)]
    pub categoria: Option<String>,
}

impl NoteInput {
    /// Trim and validate the payload
    ///
    /// Content is kept verbatim apart from trailing whitespace, since dispatch
    /// templates are often indented.
    pub fn normalized(&self) -> Result<NoteInput, SharedError> {
        let titulo = self.titulo.trim();
        if titulo.is_empty() {
            return Err(SharedError::validation("titulo", "Title cannot be empty"));
        }
        if titulo.chars().count() > MAX_TITLE_LEN {
            return Err(SharedError::too_long("titulo", MAX_TITLE_LEN));
        }

        let contenido = self.contenido.trim_end();
        if contenido.chars().count() > MAX_CONTENT_LEN {
            return Err(SharedError::too_long("contenido", MAX_CONTENT_LEN));
        }

        let categoria = self
            .categoria
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(NoteInput {
            titulo: titulo.to_string(),
            contenido: contenido.to_string(),
            categoria,
        })
    }
}
