//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token lifetimes, signing and cookie configuration
//! - `database` - Store backend and connection pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `notifier` - Origin-change notification sender
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod notifier;
pub mod server;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, SessionConfig};
pub use database::{DatabaseConfig, StorageBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notifier::NotifierConfig;
pub use server::ServerConfig;

/// Prefix for environment overrides, e.g. `SA_AUTH__JWT__SECRET`
pub const ENV_PREFIX: &str = "SA";

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default = "Environment::from_env")]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Notification configuration
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file layered under
    /// `SA_`-prefixed environment variables.
    ///
    /// `JWT_SECRET` and `DATABASE_URL` are honoured as direct overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            cfg.auth.jwt.secret = secret;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` for the detected environment, then the configuration
    /// file named by `CONFIG_PATH` (if any) and the environment overrides.
    pub fn from_env() -> Result<Self, SettingsError> {
        let env = Environment::from_env();
        dotenvy::from_filename(env.env_file()).ok();
        dotenvy::dotenv().ok();

        let path = std::env::var("CONFIG_PATH").ok();
        Self::load(path.as_deref().map(Path::new))
    }

    /// Reject configurations the token lifecycle cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let jwt = &self.auth.jwt;
        if jwt.secret.is_empty() {
            return Err(SettingsError::Invalid("auth.jwt.secret must not be empty".into()));
        }
        if self.environment.is_production() && jwt.is_using_default_secret() {
            return Err(SettingsError::Invalid(
                "auth.jwt.secret must be changed in production".into(),
            ));
        }
        if jwt.access_token_expiry == 0 || jwt.refresh_token_expiry == 0 {
            return Err(SettingsError::Invalid("token lifetimes must be positive".into()));
        }
        if jwt.store_timeout_ms == 0 || jwt.notify_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "auth.jwt store and notify timeouts must be positive".into(),
            ));
        }
        if !(4..=31).contains(&jwt.hash_cost) {
            return Err(SettingsError::Invalid(format!(
                "auth.jwt.hash_cost must be between 4 and 31, got {}",
                jwt.hash_cost
            )));
        }
        Ok(())
    }
}
