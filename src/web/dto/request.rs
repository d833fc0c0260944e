//! Request DTOs for the COBBS web layer.

use serde::Deserialize;
use validator::Validate;

/// Signup form.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}
