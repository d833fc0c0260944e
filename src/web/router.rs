//! Router configuration for the COBBS web layer.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_complaint, create_help, create_lost_found, download_upload, list_complaints, list_help,
    list_lost_found, login, logout, service_status, signup, AppState,
};
use super::middleware::session_context;

/// Slack on top of the configured upload cap for the rest of the form.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Create the main router.
///
/// Posting requires a session; listings, signup/login and downloads
/// are open.
pub fn create_router(app_state: Arc<AppState>, max_upload_size: Option<u64>) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout));

    let board_routes = Router::new()
        .route("/lostfound", get(list_lost_found).post(create_lost_found))
        .route("/complaint", get(list_complaints).post(create_complaint))
        .route("/help", get(list_help).post(create_help));

    // No cap configured means uploads of any size are accepted
    let body_limit = match max_upload_size {
        Some(max) => DefaultBodyLimit::max(max as usize + BODY_LIMIT_SLACK),
        None => DefaultBodyLimit::disable(),
    };

    // Clone the store for the middleware closure
    let session_store = app_state.sessions.clone();

    Router::new()
        .route("/", get(service_status))
        .merge(auth_routes)
        .merge(board_routes)
        .route("/uploads/:name", get(download_upload))
        .layer(body_limit)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(move |req, next| {
                    let store = session_store.clone();
                    session_context(store, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
