//! Outbound email utility

pub mod handlers;
pub mod mailer;

pub use handlers::send_mail;
pub use mailer::Mailer;
