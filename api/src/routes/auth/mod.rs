//! Authentication route handlers
//!
//! This module contains the token endpoints:
//! - Token issuance for a client identifier
//! - Refresh secret rotation

pub mod issue;
pub mod refresh;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;

use crate::state::AppState;

pub use issue::issue_tokens;
pub use refresh::refresh_tokens;

/// Network origin of the caller: the peer IP, without port
pub(crate) fn client_origin(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// HttpOnly cookie scoped to the whole site, living as long as the refresh secret
pub(crate) fn session_cookie(state: &AppState, name: &str, value: &str) -> Cookie<'static> {
    Cookie::build(name.to_owned(), value.to_owned())
        .path("/")
        .http_only(true)
        .secure(state.session.secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(state.refresh_cookie_max_age()))
        .finish()
}
