//! Shared Module
//!
//! This module contains the request/response types of the REST API. They are
//! plain serde types with no server dependencies, so a Rust client can reuse
//! them without enabling the `ssr` feature.

/// Shared error types
pub mod error;

/// Application catalog types
pub mod applications;

/// Link/unlink responses for base/rel resources
pub mod links;

/// Note template types
pub mod notes;

/// Email utility types
pub mod mail;

/// AI text correction types
pub mod correction;

pub use error::SharedError;
pub use applications::{Application, CatalogEntry, NewApplication};
pub use links::{LinkResponse, RemovalResponse};
pub use notes::{NoteInput, NoteTemplate};
pub use mail::{SendMailRequest, SendMailResponse};
pub use correction::{CorrectionRequest, CorrectionResponse};
