//! Domain-specific error types and error handling.

mod types;


pub use types::TokenError;

use sa_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Persistence failure, not interpreted further by the core
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Wrap any persistence failure
    pub fn store(err: impl std::fmt::Display) -> Self {
        DomainError::Store {
            message: err.to_string(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Token(err) => err.to_error_response(),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::Store { .. }
            | DomainError::Notification { .. }
            | DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
