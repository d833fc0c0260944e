//! Test helpers for Web API integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum_test::{TestServer, TestServerConfig};
use serde_json::json;
use tempfile::TempDir;

use cobbs::web::handlers::AppState;
use cobbs::web::router::{create_health_router, create_router};
use cobbs::{Config, Database};

/// A test application: in-memory database, temporary upload directory
/// and a cookie-aware test server.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    /// Owns the upload directory for the lifetime of the test.
    pub upload_dir: TempDir,
}

/// Create a test configuration rooted at the given upload directory.
pub fn create_test_config(upload_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.uploads.dir = upload_dir.path().to_string_lossy().into_owned();
    config.uploads.max_upload_size_mb = Some(1);
    config.session.secret = Some("test-secret-for-testing-only".to_string());
    config
}

/// Create a test app with an in-memory database.
pub async fn create_test_app() -> TestApp {
    let upload_dir = TempDir::new().unwrap();
    let config = create_test_config(&upload_dir);

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let state = Arc::new(AppState::from_config(&config, db).expect("Failed to build app state"));

    let router = create_router(state.clone(), config.uploads.max_upload_size_bytes())
        .merge(create_health_router());

    let server_config = TestServerConfig {
        save_cookies: true,
        ..Default::default()
    };
    let server =
        TestServer::new_with_config(router, server_config).expect("Failed to create test server");

    TestApp {
        server,
        state,
        upload_dir,
    }
}

/// Sign up a user through the form endpoint.
pub async fn signup_user(app: &TestApp, username: &str, email: &str, password: &str) {
    app.server
        .post("/signup")
        .form(&json!({
            "username": username,
            "email": email,
            "password": password,
            "confirm_password": password,
        }))
        .await;
}

/// Log in a user through the form endpoint, establishing a session
/// cookie on the test server.
pub async fn login_user(app: &TestApp, username: &str, password: &str) {
    app.server
        .post("/login")
        .form(&json!({
            "username": username,
            "password": password,
        }))
        .await;
}

/// Sign up and log in a default member.
pub async fn login_default_member(app: &TestApp) {
    signup_user(app, "member", "member@example.com", "secret1").await;
    login_user(app, "member", "secret1").await;
}

/// Decode the flash cookie of a response.
pub fn flash_of(response: &axum_test::TestResponse) -> (cobbs::web::flash::FlashKind, String) {
    let cookie = response.cookie(cobbs::web::flash::FLASH_COOKIE);
    cobbs::web::flash::parse_flash(cookie.value()).expect("flash cookie should decode")
}
