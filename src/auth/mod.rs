//! Authentication module for COBBS.
//!
//! Provides password hashing, user registration, credential verification
//! and session management.

mod password;
mod registration;
mod session;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{register, RegistrationError, RegistrationRequest, MAX_USERNAME_LENGTH};
pub use session::{
    LimitResult, LoginLimiter, Session, SessionError, SessionStore, DEFAULT_SESSION_TTL_SECS,
    LOCKOUT_DURATION_SECS, MAX_LOGIN_ATTEMPTS,
};

use thiserror::Error;
use tracing::warn;

use crate::db::{User, UserRepository};

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No user with the given username exists.
    #[error("user not found")]
    NotFound,

    /// The password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Verify a username/password pair against the identity store.
///
/// Returns the matching user on success. Fails with [`AuthError::NotFound`]
/// when the username is unknown and [`AuthError::InvalidCredentials`] when
/// the hash check fails. The plaintext password is never logged.
pub async fn authenticate(
    repo: &UserRepository<'_>,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = repo
        .get_by_username(username)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?
        .ok_or_else(|| {
            warn!(username = %username, "Login failed: user not found");
            AuthError::NotFound
        })?;

    match verify_password(password, &user.password) {
        Ok(()) => Ok(user),
        Err(_) => {
            warn!(username = %username, "Login failed: wrong password");
            Err(AuthError::InvalidCredentials)
        }
    }
}
