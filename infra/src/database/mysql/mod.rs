//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

mod token_repository_impl;

pub use token_repository_impl::{MySqlTokenRepository, MySqlTokenTransaction};
