//! Application Catalog Types
//!
//! Wire types for the per-user bookmark catalog ("aplicativos"). A catalog
//! entry lives once in `aplicativos_base`; users are linked to it through
//! `aplicativos_rel`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum length of an application name
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of an application URL
pub const MAX_URL_LEN: usize = 2048;

/// An application as seen by one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Application {
    /// Base entry ID
    pub id: i64,
    /// Display name
    pub nombre: String,
    /// Target URL
    pub url: String,
    /// Optional icon identifier or URL
    pub icono: Option<String>,
    /// When the user linked this application
    pub linked_at: DateTime<Utc>,
}

/// A base catalog entry with the number of users linked to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub nombre: String,
    pub url: String,
    pub icono: Option<String>,
    /// Number of users currently linked
    pub users: i64,
}

/// Request body for `POST /api/aplicativos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub nombre: String,
    pub url: String,
    #[serde(default)]
    pub icono: Option<String>,
}

impl NewApplication {
    /// Trim and validate the payload
    ///
    /// Returns a normalized copy: surrounding whitespace removed and an empty
    /// icon collapsed to `None`.
    pub fn normalized(&self) -> Result<NewApplication, SharedError> {
        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            return Err(SharedError::validation("nombre", "Name cannot be empty"));
        }
        if nombre.chars().count() > MAX_NAME_LEN {
            return Err(SharedError::too_long("nombre", MAX_NAME_LEN));
        }

        let url = self.url.trim();
        if url.is_empty() {
            return Err(SharedError::validation("url", "URL cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SharedError::validation(
                "url",
                "URL must start with http:// or https://",
            ));
        }
        if url.len() > MAX_URL_LEN {
            return Err(SharedError::too_long("url", MAX_URL_LEN));
        }

        let icono = self
            .icono
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .map(str::to_string);

        Ok(NewApplication {
            nombre: nombre.to_string(),
            url: url.to_string(),
            icono,
        })
    }
}
