use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::TokenResponse;
use crate::handlers::error::{handle_domain_error, unauthorized};
use crate::state::AppState;

use super::{client_origin, session_cookie};

/// Handler for POST /refresh
///
/// Redeems the refresh secret cookie for a new token pair. The old secret
/// stops working as soon as this succeeds.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "user_id": "string",
///     "access_token": "eyJ..."
/// }
/// ```
/// A new refresh secret cookie replaces the old one.
///
/// ## Errors
/// - 401 Unauthorized: Missing cookies, unknown or consumed secret
///   (`TOKEN_INVALID`), or expired secret (`TOKEN_EXPIRED`)
/// - 500 Internal Server Error: Store or token generation failure
pub async fn refresh_tokens(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let session = &state.session;
    let (Some(secret), Some(subject)) = (
        req.cookie(&session.refresh_cookie_name),
        req.cookie(&session.subject_cookie_name),
    ) else {
        return unauthorized("Refresh token cookie is missing");
    };

    let origin = client_origin(&req);
    match state
        .coordinator
        .refresh_tokens(subject.value(), &origin, secret.value())
        .await
    {
        Ok(pair) => HttpResponse::Ok()
            .cookie(session_cookie(
                &state,
                &session.refresh_cookie_name,
                &pair.refresh_token,
            ))
            .json(TokenResponse {
                user_id: subject.value().to_string(),
                access_token: pair.access_token,
            }),
        Err(error) => handle_domain_error(error),
    }
}
