//! Mapping of domain errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use sa_core::errors::{DomainError, TokenError};
use sa_shared::errors::{error_codes, IntoErrorResponse};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Status code for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Token(
            TokenError::TokenNotFound
            | TokenError::TokenExpired
            | TokenError::InvalidAccessToken
            | TokenError::AccessTokenExpired,
        ) => StatusCode::UNAUTHORIZED,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a domain error into a response
///
/// Internal failures are logged with their details; the body only carries
/// a generic message.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }
    error.to_error_response().to_response(status)
}

/// 401 with the generic unauthorized code
pub fn unauthorized(message: &str) -> HttpResponse {
    ErrorResponse::new(error_codes::UNAUTHORIZED, message).to_response(StatusCode::UNAUTHORIZED)
}

/// 400 listing the fields that failed validation
pub fn validation_error(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();
    ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        format!("Invalid fields: {}", fields.join(", ")),
    )
    .to_response(StatusCode::BAD_REQUEST)
}
