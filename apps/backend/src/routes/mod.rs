use actix_web::{error, web, HttpRequest};
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::JwtExtract;

pub mod admin;
pub mod auth;
pub mod health;
pub mod quiz;
pub mod status;

/// Every route of the service, with `JwtExtract` on the authenticated ones.
///
/// `main.rs` and the integration tests both mount this, so the tests see the
/// same paths and guards as production. App-wide middleware (tracing,
/// logging, CORS) is added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));

    health::configure_routes(cfg);
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(
        web::scope("/api/quiz")
            .wrap(JwtExtract)
            .configure(quiz::configure_routes),
    );
    cfg.service(
        web::scope("/api/admin")
            .wrap(JwtExtract)
            .configure(admin::configure_routes),
    );
    status::configure_routes(cfg);
}

fn path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "Rejected path parameters");
    AppError::bad_request(ErrorCode::BadRequest, "Invalid path parameter").into()
}

fn query_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "Rejected query string");
    AppError::bad_request(ErrorCode::BadRequest, "Invalid query string").into()
}
