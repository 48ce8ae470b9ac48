use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;
use user_service::{
    api::{self, middleware::RequestId},
    app_state::AppState,
    database::{self, UserStore},
};

pub struct TestContext {
    pub state: web::Data<AppState>,
    _dir: TempDir,
}

impl TestContext {
    /// Fresh SQLite database in a temporary directory, schema applied.
    pub async fn new() -> TestContext {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("users.db").display());

        let db = database::connect_from_url(&url)
            .await
            .expect("Failed to connect to sqlite");
        database::ensure_schema(&db)
            .await
            .expect("Failed to create schema");

        TestContext {
            state: web::Data::new(AppState::new(UserStore::new(db))),
            _dir: dir,
        }
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &UserStore {
        &self.state.users
    }

    #[allow(dead_code)]
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .wrap(RequestId)
            .app_data(self.state.clone())
            .app_data(api::json_config(64 * 1024))
            .configure(api::init_routes)
    }
}

// Test data helpers
#[allow(dead_code)]
pub mod test_data {
    use super::*;

    pub fn alice() -> Value {
        json!({"username": "alice", "email": "a@x.com", "password": "secret1"})
    }

    pub fn user_with_email(username: &str, email: &str) -> Value {
        json!({"username": username, "email": email, "password": "secret1"})
    }
}
