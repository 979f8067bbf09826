//! Application factory
//!
//! Builds the Actix-web application around a shared [`AppState`].

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{error, web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sa_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::routes::auth::{issue_tokens, refresh_tokens};
use crate::routes::health::health_check;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(json_config())
        .wrap(TracingLogger::default())
        .configure(configure_routes)
        .default_service(web::route().to(not_found))
}

/// Register the token and health endpoints
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/auth", web::post().to(issue_tokens))
        .route("/refresh", web::post().to(refresh_tokens));
}

/// Malformed JSON bodies are answered with the standard error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4096)
        .error_handler(|err, _req| {
            let response = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string())
                .to_response(actix_web::http::StatusCode::BAD_REQUEST);
            error::InternalError::from_response(err, response).into()
        })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )
    .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
