//! Shared configuration and common types for the simple auth server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types and loading
//! - Error response structures and codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    NotifierConfig, ServerConfig, SessionConfig, SettingsError, StorageBackend,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
