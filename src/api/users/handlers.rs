use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};

use crate::{
    app_state::AppState,
    errors::{AppError, ErrorResponse},
};

use super::structures::{
    CreateUserPayload, CreateUserResponse, CreatedUserRef, MessageResponse, UpdateUserPayload,
    UserListResponse, UserView,
};

#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    responses(
        (status = 200, description = "All users, password omitted", body = UserListResponse)
    )
)]
pub async fn get_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = app_state.users.list().await?;
    let users = users.iter().map(UserView::from).collect();
    Ok(HttpResponse::Ok().json(UserListResponse { users }))
}

#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created successfully", body = CreateUserResponse),
        (status = 400, description = "Validation failed or email already in use", body = ErrorResponse)
    )
)]
pub async fn create_user(
    app_state: web::Data<AppState>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let new_user = CreateUserPayload::from_json(body.into_inner())?;
    let created = app_state.users.create(new_user).await?;
    log::info!("Created user id={}", created.id);

    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user: CreatedUserRef { id: created.id },
    }))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserView),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let user = app_state
        .users
        .find(user_id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    Ok(HttpResponse::Ok().json(UserView::from(&user)))
}

#[utoipa::path(
    put,
    path = "/user/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated successfully", body = MessageResponse),
        (status = 400, description = "Validation failed or email already in use", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let changes = UpdateUserPayload::from_json(body.into_inner())?;
    app_state.users.update(user_id, changes).await?;
    log::info!("Updated user id={}", user_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("User updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    app_state.users.delete(user_id).await?;
    log::info!("Deleted user id={}", user_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

// Explicit route table for the user resource.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/user")
            .route(web::get().to(get_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/user/{id}")
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
