use utoipa::OpenApi;

use crate::{
    api::{
        system,
        users::{self, handlers},
        validation::{FieldError, FieldErrorKind},
    },
    errors::ErrorResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        system::home,
        system::health_check,
        // Users
        handlers::get_users,
        handlers::create_user,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(
        schemas(
            users::CreateUserPayload,
            users::UpdateUserPayload,
            users::UserView,
            users::UserListResponse,
            users::CreateUserResponse,
            users::CreatedUserRef,
            users::MessageResponse,
            ErrorResponse,
            FieldError,
            FieldErrorKind,
        )
    ),
    tags(
        (name = "System", description = "Liveness endpoints"),
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;
