//! Token lifecycle error types
//!
//! Messages are safe to surface to callers; internal failures carry a
//! diagnostic `message` that the presentation layer logs but never returns.

use sa_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to sign access token: {message}")]
    Signing { message: String },

    #[error("Random source unavailable: {message}")]
    EntropySource { message: String },

    #[error("Failed to hash refresh secret: {message}")]
    Hashing { message: String },

    /// Unknown subject and secret mismatch share this variant
    #[error("Refresh token not found or already used")]
    TokenNotFound,

    #[error("Refresh token expired and has been deleted")]
    TokenExpired,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Access token expired")]
    AccessTokenExpired,
}

impl IntoErrorResponse for TokenError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            TokenError::TokenNotFound | TokenError::InvalidAccessToken => {
                ErrorResponse::new(error_codes::TOKEN_INVALID, self.to_string())
            }
            TokenError::TokenExpired | TokenError::AccessTokenExpired => {
                ErrorResponse::new(error_codes::TOKEN_EXPIRED, self.to_string())
            }
            TokenError::Signing { .. }
            | TokenError::EntropySource { .. }
            | TokenError::Hashing { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Failed to issue tokens")
            }
        }
    }
}
