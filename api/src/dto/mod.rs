//! Request and response bodies

pub mod auth;
pub mod error;

pub use auth::{IssueTokenRequest, TokenResponse};
pub use error::{ErrorResponse, ErrorResponseExt};
