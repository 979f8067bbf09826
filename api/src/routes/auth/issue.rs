use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::auth::{IssueTokenRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, validation_error};
use crate::state::AppState;

use super::{client_origin, session_cookie};

/// Handler for POST /auth
///
/// Issues a token pair for a client identifier, replacing any session the
/// identifier already had.
///
/// # Request Body
///
/// ```json
/// {
///     "guid": "string",
///     "email": "user@example.com"
/// }
/// ```
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
/// The refresh secret and the identifier are set as HttpOnly cookies.
///
/// ## Errors
/// - 400 Bad Request: Missing identifier or invalid email
/// - 500 Internal Server Error: Signing, hashing or store failure
pub async fn issue_tokens(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<IssueTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    let origin = client_origin(&req);
    match state
        .coordinator
        .issue_tokens(&request.guid, &request.email, &origin)
        .await
    {
        Ok(pair) => HttpResponse::Ok()
            .cookie(session_cookie(
                &state,
                &state.session.refresh_cookie_name,
                &pair.refresh_token,
            ))
            .cookie(session_cookie(
                &state,
                &state.session.subject_cookie_name,
                &request.guid,
            ))
            .json(TokenResponse {
                user_id: request.guid.clone(),
                access_token: pair.access_token,
            }),
        Err(error) => handle_domain_error(error),
    }
}
