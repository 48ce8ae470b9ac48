use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    api::validation::{
        FieldError, check_email, check_password, check_username, has_error, normalize_email,
        take_string_fields,
    },
    database::{NewUser, UserChanges, models::user},
    errors::AppError,
};

const USER_FIELDS: [&str; 3] = ["username", "email", "password"];

// --- Request payloads ---

/// Body of `POST /user`. Fields are optional here so that every missing one
/// can be reported together during validation.
#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
pub struct CreateUserPayload {
    #[schema(min_length = 3, max_length = 150)]
    pub username: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(min_length = 6, format = Password)]
    pub password: Option<String>,
}

impl CreateUserPayload {
    /// Validates a raw JSON object, reporting wrong types and unknown keys
    /// together with the field rules.
    pub fn from_json(body: Map<String, Value>) -> Result<NewUser, AppError> {
        let mut errors = Vec::new();
        let mut fields = take_string_fields(body, &USER_FIELDS, &mut errors);
        let payload = Self {
            username: fields.remove("username"),
            email: fields.remove("email"),
            password: fields.remove("password"),
        };
        payload.check(errors)
    }

    pub fn validate(self) -> Result<NewUser, AppError> {
        self.check(Vec::new())
    }

    fn check(self, mut errors: Vec<FieldError>) -> Result<NewUser, AppError> {
        check_required(self.username.as_deref(), "username", check_username, &mut errors);
        check_required(self.email.as_deref(), "email", check_email, &mut errors);
        check_required(self.password.as_deref(), "password", check_password, &mut errors);

        match (self.username, self.email, self.password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(NewUser {
                username,
                email: normalize_email(&email),
                password,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Runs `check` on a required field, or reports it missing unless it already
/// failed the type check.
fn check_required(
    value: Option<&str>,
    field: &str,
    check: fn(&str, &mut Vec<FieldError>),
    errors: &mut Vec<FieldError>,
) {
    match value {
        Some(value) => check(value, errors),
        None if !has_error(errors, field) => errors.push(FieldError::missing(field)),
        None => {}
    }
}

/// Body of `PUT /user/{id}`. Absent or `null` fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
pub struct UpdateUserPayload {
    #[schema(min_length = 3, max_length = 150)]
    pub username: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(min_length = 6, format = Password)]
    pub password: Option<String>,
}

impl UpdateUserPayload {
    pub fn from_json(body: Map<String, Value>) -> Result<UserChanges, AppError> {
        let mut errors = Vec::new();
        let mut fields = take_string_fields(body, &USER_FIELDS, &mut errors);
        let payload = Self {
            username: fields.remove("username"),
            email: fields.remove("email"),
            password: fields.remove("password"),
        };
        payload.check(errors)
    }

    pub fn validate(self) -> Result<UserChanges, AppError> {
        self.check(Vec::new())
    }

    fn check(self, mut errors: Vec<FieldError>) -> Result<UserChanges, AppError> {
        if let Some(username) = self.username.as_deref() {
            check_username(username, &mut errors);
        }
        if let Some(email) = self.email.as_deref() {
            check_email(email, &mut errors);
        }
        if let Some(password) = self.password.as_deref() {
            check_password(password, &mut errors);
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(UserChanges {
            username: self.username,
            email: self.email.as_deref().map(normalize_email),
            password: self.password,
        })
    }
}

// --- Responses ---

/// Public projection of a user; the password never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&user::Model> for UserView {
    fn from(model: &user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username.clone(),
            email: model.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserListResponse {
    pub users: Vec<UserView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreatedUserRef {
    pub id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: CreatedUserRef,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
