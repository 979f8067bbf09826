//! # Simple Auth Core
//!
//! Core token lifecycle for the simple auth backend.
//! This crate contains the session record entities, the token authority,
//! the rotation coordinator, the store and notifier contracts, and the error
//! types shared by the infrastructure and API layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
