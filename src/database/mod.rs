pub mod connector;
pub mod models;
pub mod schema;
pub mod users;

// Re-exported so callers can write `database::connect_*()` and `database::UserStore`
pub use connector::{DB, connect_from_url, connect_with_settings, ping};
pub use schema::{drop_schema, ensure_schema};
pub use users::{NewUser, UserChanges, UserStore};
