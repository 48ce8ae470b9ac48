use actix_web::web;

use crate::errors::AppError;

pub mod docs;
pub mod middleware;
pub mod system;
pub mod users;
pub mod validation;

/// JSON extractor settings shared by every route: body size limit and
/// malformed payloads reported as `INVALID_INPUT`.
pub fn json_config(max_body_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_body_bytes)
        .error_handler(|err, _req| {
            log::debug!("Rejected JSON payload: {}", err);
            AppError::InvalidInput(err.to_string()).into()
        })
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(system::init_routes)
        .configure(users::init_routes);
}
