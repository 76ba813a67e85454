//! Dispatch note templates ("plantillas")

pub mod db;
pub mod handlers;

pub use handlers::{create_note, delete_note, list_notes, update_note};
