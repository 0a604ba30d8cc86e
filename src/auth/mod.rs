pub mod extractors;
pub mod password;
pub mod service;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::PublicUser;

// Re-export necessary items
pub use extractors::{authenticate, AuthenticatedUserId};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenCodec, TokenError};

/// The one message used for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    // Basic local@domain.tld shape; deliverability is not checked.
    static ref EMAIL_REGEX: regex::Regex = regex::Regex::new(r"^\S+@\S+\.\S+$").unwrap();
}

/// Represents the payload for a new user registration request.
///
/// Missing fields deserialize as empty strings so that they are reported by
/// [`RegisterRequest::validate_fields`] rather than by the JSON extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Validates in a fixed order and stops at the first failure: presence, email shape,
    /// password length.
    pub fn validate_fields(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(AppError::ValidationError(
                "Name, email, and password are required".into(),
            ));
        }
        if !EMAIL_REGEX.is_match(self.email.trim()) {
            return Err(AppError::ValidationError(
                "Please provide a valid email address".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::ValidationError(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate_fields(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::ValidationError(
                "Email and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Response payload after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT for bearer authentication.
    pub token: String,
    /// Redacted view of the authenticated user.
    pub user: PublicUser,
}
