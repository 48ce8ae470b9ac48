use actix_web::{HttpResponse, web};

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

#[utoipa::path(
    get,
    path = "/healthCheck",
    tag = "System",
    responses(
        (status = 200, description = "Liveness probe", body = String, content_type = "text/plain")
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("healthcheck")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/healthCheck").route(web::get().to(health_check)));
}
