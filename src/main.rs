use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use user_service::api::{self, docs::ApiDoc, middleware::RequestId};
use user_service::app_state::AppState;
use user_service::config::Config;
use user_service::database::{self, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;

    log::info!("Connecting to database at {}", config.database_url);
    let db = database::connect_with_settings(&config.database_settings()).await?;
    database::ensure_schema(&db)
        .await
        .map_err(std::io::Error::other)?;

    log::warn!(
        "Passwords are stored without hashing; do not expose this service to untrusted clients"
    );

    let state = web::Data::new(AppState::new(UserStore::new(db)));
    let max_body_bytes = config.effective_max_body_bytes();
    let host = config.host.clone();
    let port = config.port;

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestId)
            .app_data(state.clone())
            .app_data(api::json_config(max_body_bytes))
            .configure(api::init_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
