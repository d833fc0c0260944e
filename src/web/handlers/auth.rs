//! Signup, login and logout handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::auth::{
    authenticate, register, AuthError, LimitResult, RegistrationError, RegistrationRequest,
};
use crate::db::UserRepository;
use crate::web::dto::{LoginRequest, SignupRequest};
use crate::web::flash::{flash_redirect, FlashKind};
use crate::web::handlers::AppState;
use crate::web::middleware::{clear_session_cookie, session_cookie, SESSION_COOKIE};

/// Pull the first human-readable message out of validator errors.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// POST /signup - Create a new account.
///
/// Responds with a flash message and a redirect in both outcomes
/// (Post/Redirect/Get).
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<SignupRequest>,
) -> (CookieJar, Redirect) {
    if let Err(errors) = req.validate() {
        return flash_redirect(jar, FlashKind::Error, &first_validation_message(&errors), "/");
    }

    let repo = UserRepository::new(state.db.pool());
    let request = RegistrationRequest::new(&req.username, &req.email, &req.password)
        .with_confirmation(&req.confirm_password);

    match register(&repo, request).await {
        Ok(_) => flash_redirect(
            jar,
            FlashKind::Success,
            "Account created! Please login.",
            "/",
        ),
        Err(RegistrationError::PasswordMismatch) => {
            flash_redirect(jar, FlashKind::Error, "Passwords do not match", "/")
        }
        Err(RegistrationError::WeakPassword(e)) => {
            flash_redirect(jar, FlashKind::Error, &e.to_string(), "/")
        }
        Err(RegistrationError::DuplicateIdentity) => flash_redirect(
            jar,
            FlashKind::Error,
            "Username or email already exists",
            "/",
        ),
        Err(RegistrationError::Validation(msg)) => {
            flash_redirect(jar, FlashKind::Error, &msg, "/")
        }
        Err(e) => {
            tracing::error!("Signup failed: {}", e);
            flash_redirect(jar, FlashKind::Error, "Signup failed, please try again", "/")
        }
    }
}

/// POST /login - Establish a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> (CookieJar, Redirect) {
    if req.username.is_empty() || req.password.is_empty() {
        return flash_redirect(
            jar,
            FlashKind::Error,
            "Username and password are required",
            "/",
        );
    }

    if let LimitResult::Locked(remaining) = state.sessions.check_limit(&req.username) {
        tracing::warn!(
            username = %req.username,
            remaining_secs = remaining.as_secs(),
            "Login attempt blocked: account locked"
        );
        return flash_redirect(
            jar,
            FlashKind::Error,
            "Too many failed attempts, please try again later",
            "/",
        );
    }

    let repo = UserRepository::new(state.db.pool());
    match authenticate(&repo, &req.username, &req.password).await {
        Ok(user) => {
            state.sessions.clear_failures(&req.username);
            let _ = repo.update_last_login(user.id).await;

            let session = state.sessions.create(&user);
            tracing::info!(username = %user.username, "Login successful");

            let jar = jar.add(session_cookie(&session));
            flash_redirect(jar, FlashKind::Success, "Login successful!", "/")
        }
        Err(AuthError::NotFound) | Err(AuthError::InvalidCredentials) => {
            state.sessions.record_failure(&req.username);
            flash_redirect(jar, FlashKind::Error, "Invalid username or password", "/")
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            flash_redirect(jar, FlashKind::Error, "Login failed, please try again", "/")
        }
    }
}

/// GET /logout - Tear down the session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.logout(cookie.value());
    }

    let jar = jar.remove(clear_session_cookie());
    flash_redirect(jar, FlashKind::Success, "Logged out successfully", "/")
}
