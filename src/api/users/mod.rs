pub mod handlers;
pub mod structures;

pub use handlers::{create_user, delete_user, get_user, get_users, init_routes, update_user};

pub use structures::{
    CreateUserPayload, CreateUserResponse, CreatedUserRef, MessageResponse, UpdateUserPayload,
    UserListResponse, UserView,
};
