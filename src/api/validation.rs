//! Field rules for incoming user payloads.
//! Each check reports every violated field instead of stopping at the first.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 6;

lazy_static::lazy_static! {
    // dot-separated local part, then hostname labels ending in an alphabetic TLD
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9_%+-]+(?:\.[A-Za-z0-9_%+-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    TooShort,
    TooLong,
    InvalidEmail,
    InvalidType,
    UnknownField,
}

/// One problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            kind,
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, FieldErrorKind::Missing, "field required")
    }

    pub fn invalid_type(field: &str) -> Self {
        Self::new(field, FieldErrorKind::InvalidType, "must be a string")
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(field, FieldErrorKind::UnknownField, "extra fields not permitted")
    }
}

/// True when `errors` already holds a problem for `field`.
pub fn has_error(errors: &[FieldError], field: &str) -> bool {
    errors.iter().any(|e| e.field == field)
}

/// Pulls the `expected` string fields out of a raw JSON object.
///
/// `null` counts as absent. A non-string value is reported as `invalid_type`
/// and any key outside `expected` as `unknown_field`; neither shows up in
/// the returned map.
pub fn take_string_fields(
    mut body: Map<String, Value>,
    expected: &[&str],
    errors: &mut Vec<FieldError>,
) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for &field in expected {
        match body.remove(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(value)) => {
                fields.insert(field.to_string(), value);
            }
            Some(_) => errors.push(FieldError::invalid_type(field)),
        }
    }
    for key in body.keys() {
        errors.push(FieldError::unknown_field(key));
    }

    fields
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lowercases the domain part; the local part is kept as submitted.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => email.to_string(),
    }
}

/// Lengths are counted in characters, not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn check_username(value: &str, errors: &mut Vec<FieldError>) {
    let len = char_len(value);
    if len < USERNAME_MIN_CHARS {
        errors.push(FieldError::new(
            "username",
            FieldErrorKind::TooShort,
            format!("must be at least {} characters", USERNAME_MIN_CHARS),
        ));
    } else if len > USERNAME_MAX_CHARS {
        errors.push(FieldError::new(
            "username",
            FieldErrorKind::TooLong,
            format!("must be at most {} characters", USERNAME_MAX_CHARS),
        ));
    }
}

pub fn check_email(value: &str, errors: &mut Vec<FieldError>) {
    if !validate_email(value) {
        errors.push(FieldError::new(
            "email",
            FieldErrorKind::InvalidEmail,
            "value is not a valid email address",
        ));
    }
}

pub fn check_password(value: &str, errors: &mut Vec<FieldError>) {
    if char_len(value) < PASSWORD_MIN_CHARS {
        errors.push(FieldError::new(
            "password",
            FieldErrorKind::TooShort,
            format!("must be at least {} characters", PASSWORD_MIN_CHARS),
        ));
    }
}
