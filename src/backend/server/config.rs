/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (after `.env` has been
 * read by `main`), with defaults suitable for local development.
 *
 * | Variable        | Default                                      |
 * |-----------------|----------------------------------------------|
 * | `DATABASE_URL`  | `sqlite://despacho.db?mode=rwc`              |
 * | `SERVER_PORT`   | `3001`                                       |
 * | `CORS_ORIGIN`   | `http://localhost:3000`                      |
 * | `SMTP_HOST`     | unset (mail disabled)                        |
 * | `SMTP_PORT`     | `587`                                        |
 * | `SMTP_USER`     | unset                                        |
 * | `SMTP_PASSWORD` | unset                                        |
 * | `MAIL_FROM`     | unset (mail disabled)                        |
 * | `AI_API_KEY`    | unset (AI disabled)                          |
 * | `AI_MODEL`      | `gemini-1.5-flash`                           |
 * | `AI_BASE_URL`   | `https://generativelanguage.googleapis.com`  |
 *
 * `JWT_SECRET` and `JWT_TTL_HOURS` are read by `auth::sessions`.
 *
 * # Error Handling
 *
 * Malformed values (a non-numeric port, say) are configuration errors.
 * Missing optional services are not: the server starts without them and the
 * corresponding endpoints answer 503.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://despacho.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// SMTP relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `From:` mailbox, e.g. `Despacho B2B <despacho@example.com>`
    pub from: String,
}

/// Generative-text API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    /// Allowed CORS origin; `*` allows any
    pub cors_origin: String,
    pub mail: Option<MailConfig>,
    pub ai: Option<AiConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            mail: None,
            ai: None,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = ServerConfig::builder();

        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(port) = get("SERVER_PORT") {
            builder = builder.port(parse_port("SERVER_PORT", &port)?);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            builder = builder.cors_origin(origin);
        }

        match (get("SMTP_HOST"), get("MAIL_FROM")) {
            (Some(host), Some(from)) => {
                let port = match get("SMTP_PORT") {
                    Some(port) => parse_port("SMTP_PORT", &port)?,
                    None => DEFAULT_SMTP_PORT,
                };
                builder = builder.mail(MailConfig {
                    host,
                    port,
                    username: get("SMTP_USER"),
                    password: get("SMTP_PASSWORD"),
                    from,
                });
            }
            (Some(_), None) => {
                tracing::warn!("SMTP_HOST is set but MAIL_FROM is not. Mail will be disabled.");
            }
            _ => {}
        }

        if let Some(api_key) = get("AI_API_KEY") {
            let timeout_secs = match get("AI_TIMEOUT_SECS") {
                Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: "AI_TIMEOUT_SECS",
                    value: raw,
                })?,
                None => DEFAULT_AI_TIMEOUT_SECS,
            };
            builder = builder.ai(AiConfig {
                api_key,
                model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
                base_url: get("AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
                timeout_secs,
            });
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if let Some(mail) = &self.mail {
            if !mail.from.contains('@') {
                return Err(ConfigError::InvalidValue {
                    key: "MAIL_FROM",
                    value: mail.from.clone(),
                });
            }
            if mail.username.is_some() != mail.password.is_some() {
                return Err(ConfigError::MissingValue("SMTP_USER/SMTP_PASSWORD"));
            }
        }
        if let Some(ai) = &self.ai {
            if !(ai.base_url.starts_with("http://") || ai.base_url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(ai.base_url.clone()));
            }
        }
        Ok(())
    }
}

fn parse_port(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    cors_origin: Option<String>,
    mail: Option<MailConfig>,
    ai: Option<AiConfig>,
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    pub fn mail(mut self, mail: MailConfig) -> Self {
        self.mail = Some(mail);
        self
    }

    pub fn ai(mut self, ai: AiConfig) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            port: self.port.unwrap_or(defaults.port),
            cors_origin: self.cors_origin.unwrap_or(defaults.cors_origin),
            mail: self.mail,
            ai: self.ai,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<SqlitePool>;

/// Connect to the database and run migrations
///
/// Errors are logged but do not prevent server startup. The function
/// returns `None` when the connection cannot be established; handlers then
/// answer 503.
pub async fn load_database(database_url: &str) -> DatabaseConfig {
    tracing::info!("Connecting to database...");

    let pool = match connect(database_url, 5).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    if let Err(e) = run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        tracing::warn!("Database features will be disabled.");
        return None;
    }
    tracing::info!("Database migrations completed successfully");

    Some(pool)
}

/// Open a pool with foreign keys enforced
///
/// `sqlite::memory:` databases are per-connection, so callers that use one
/// must pass `max_connections = 1`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Apply the embedded migrations in `./migrations`
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
