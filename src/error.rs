//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce is one of its variants, and each variant maps to
//! exactly one HTTP status code.
//!
//! `AppError` implements `actix_web::error::ResponseError`, rendering the same
//! `{statusCode, data, message}` envelope used by successful responses (with `data: null`).
//! Server-side variants log their detail for operators and only ever send a generic
//! message to the client. `From` implementations for `sqlx::Error` and
//! `validator::ValidationErrors` allow the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::response::ApiResponse;

/// Message sent to clients for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Sent when registering an email that already has an account.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email already exists";

/// Postgres SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Unique constraint on `users.email`, named in `migrations/`.
const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Bad credentials or a missing/invalid/expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Authenticated, but not allowed to touch the resource (HTTP 403).
    Forbidden(String),
    /// Malformed request that is not a field-level validation failure (HTTP 400).
    BadRequest(String),
    /// Missing or malformed input fields (HTTP 400).
    ValidationError(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// A uniqueness rule would be violated, e.g. duplicate registration (HTTP 409).
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500). The detail is logged, never sent.
    InternalServerError(String),
    /// Failure reported by the storage layer (HTTP 500). The detail is logged, never sent.
    DatabaseError(String),
}

impl AppError {
    /// Message that is safe to show to the caller.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into enveloped JSON responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ApiResponse::<()>::error(status, self.public_message()))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique violation on the users email constraint becomes `Conflict`; everything else,
/// including other unique violations, is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        let duplicate_email = error
            .as_database_error()
            .map(|db| is_duplicate_email(db.code().as_deref(), db.constraint()))
            .unwrap_or(false);

        if duplicate_email {
            AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.into())
        } else {
            AppError::DatabaseError(error.to_string())
        }
    }
}

fn is_duplicate_email(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(PG_UNIQUE_VIOLATION) && constraint == Some(USERS_EMAIL_CONSTRAINT)
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
