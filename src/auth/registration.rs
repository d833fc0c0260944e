//! User registration for COBBS.

use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A required field was empty or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Password and confirmation do not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password does not meet the strength requirements.
    #[error("weak password: {0}")]
    WeakPassword(PasswordError),

    /// Username or email already exists.
    #[error("username or email already exists")]
    DuplicateIdentity,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password (at least 6 characters).
    pub password: String,
    /// Optional confirmation value; must equal `password` when supplied.
    pub confirm_password: Option<String>,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    /// Set the confirmation value.
    pub fn with_confirmation(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = Some(confirm.into());
        self
    }
}

fn validate_fields(request: &RegistrationRequest) -> Result<(), RegistrationError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(RegistrationError::Validation(
            "username is required".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(RegistrationError::Validation(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }

    let email = request.email.trim();
    if email.is_empty() {
        return Err(RegistrationError::Validation(
            "email is required".to_string(),
        ));
    }
    // Minimal shape check; full format validation happens at the web boundary.
    if !email.contains('@') {
        return Err(RegistrationError::Validation(
            "email address is invalid".to_string(),
        ));
    }

    Ok(())
}

/// Register a new user.
///
/// This function:
/// 1. Validates username and email fields
/// 2. Checks the confirmation value, when one was supplied
/// 3. Checks password strength
/// 4. Checks that neither the username nor the email is taken
/// 5. Hashes the password and creates the user
///
/// The plaintext password is never stored or logged.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> Result<User, RegistrationError> {
    validate_fields(&request)?;

    if let Some(ref confirm) = request.confirm_password {
        if confirm != &request.password {
            return Err(RegistrationError::PasswordMismatch);
        }
    }

    crate::auth::validate_password(&request.password).map_err(RegistrationError::WeakPassword)?;

    let username = request.username.trim();
    let email = request.email.trim();

    if repo
        .username_exists(username)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::DuplicateIdentity);
    }
    if repo
        .email_exists(email)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::DuplicateIdentity);
    }

    let password_hash = hash_password(&request.password).map_err(RegistrationError::Password)?;

    let new_user = NewUser::new(username, email, password_hash);
    let user = repo.create(&new_user).await.map_err(|e| {
        // Unique constraints are the arbiter under concurrent signups
        if e.to_string().contains("UNIQUE") {
            RegistrationError::DuplicateIdentity
        } else {
            RegistrationError::Database(e.to_string())
        }
    })?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}
