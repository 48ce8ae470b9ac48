use crate::database::UserStore;

/// Shared per-worker state. The storage client is built once in `main` and
/// handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
}

impl AppState {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }
}
