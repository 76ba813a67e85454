//! Application catalog ("aplicativos")
//!
//! Per-user bookmarks stored once in `aplicativos_base` and linked through
//! `aplicativos_rel`.

pub mod db;
pub mod handlers;

pub use handlers::{
    add_application, link_application, list_applications, list_catalog, remove_application,
};
