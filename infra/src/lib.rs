//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the simple auth backend.
//! It provides concrete implementations of the store and notifier contracts
//! defined in `sa_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL session token store using SQLx, with migrations
//! - **Notifier**: Origin-change notices written to the log
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Notifier module - Origin-change notice delivery
pub mod notifier;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlTokenRepository};
pub use notifier::LogNotifier;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
