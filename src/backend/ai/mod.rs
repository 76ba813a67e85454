//! AI-assisted text correction

pub mod client;
pub mod handlers;

pub use client::AiClient;
pub use handlers::correct_text;
