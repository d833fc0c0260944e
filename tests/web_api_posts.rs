//! Web API post tests.
//!
//! Integration tests for post submission and listing: the session gate,
//! the form validator and newest-first ordering.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use common::{create_test_app, flash_of, login_default_member, TestApp};
use serde_json::Value;

use cobbs::web::flash::FlashKind;
use cobbs::PostRepository;

fn lost_found_form(name: &str, category: &str, item: &str, description: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_text("category", category.to_string())
        .add_text("item", item.to_string())
        .add_text("description", description.to_string())
}

async fn post_lost_found(app: &TestApp, form: MultipartForm) -> axum_test::TestResponse {
    app.server.post("/lostfound").multipart(form).await
}

// ============================================================================
// Session gate
// ============================================================================

#[tokio::test]
async fn test_posting_requires_login() {
    let app = create_test_app().await;

    let response = post_lost_found(
        &app,
        lost_found_form("Bob", "Hostel", "Wallet", "Black leather"),
    )
    .await;

    // Anonymous posting redirects to the entry page
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("log in"));

    let repo = PostRepository::new(app.state.db.pool());
    assert_eq!(repo.count_lost_found().await.unwrap(), 0);
}

#[tokio::test]
async fn test_listing_is_open() {
    let app = create_test_app().await;

    // No login: listings still answer
    app.server.get("/lostfound").await.assert_status_ok();
    app.server.get("/complaint").await.assert_status_ok();
    app.server.get("/help").await.assert_status_ok();
}

#[tokio::test]
async fn test_posting_after_logout_is_rejected() {
    let app = create_test_app().await;
    login_default_member(&app).await;
    assert_eq!(app.state.sessions.active_count(), 1);

    app.server.get("/logout").await;

    let response = post_lost_found(
        &app,
        lost_found_form("Bob", "Hostel", "Wallet", "Black leather"),
    )
    .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let repo = PostRepository::new(app.state.db.pool());
    assert_eq!(repo.count_lost_found().await.unwrap(), 0);
}

// ============================================================================
// Lost & found
// ============================================================================

#[tokio::test]
async fn test_create_lost_found_without_file() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let response = post_lost_found(
        &app,
        lost_found_form("Bob", "Hostel", "Wallet", "Black leather"),
    )
    .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/lostfound");
    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Success);
    assert!(message.contains("posted successfully"));

    // The listing returns it first, with a null image reference
    let body: Value = app.server.get("/lostfound").await.json();
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["name"], "Bob");
    assert_eq!(posts[0]["category"], "Hostel");
    assert_eq!(posts[0]["item"], "Wallet");
    assert_eq!(posts[0]["description"], "Black leather");
    assert!(posts[0]["image_url"].is_null());
}

#[tokio::test]
async fn test_create_lost_found_with_type() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = lost_found_form("Bob", "Hostel", "Umbrella", "Red, slightly bent")
        .add_text("type", "Found");
    post_lost_found(&app, form).await;

    let body: Value = app.server.get("/lostfound").await.json();
    assert_eq!(body["data"][0]["type"], "Found");
}

#[tokio::test]
async fn test_create_lost_found_invalid_category() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let response = post_lost_found(
        &app,
        lost_found_form("Bob", "Moon", "Wallet", "Black leather"),
    )
    .await;

    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("invalid category"));

    // No row persisted
    let repo = PostRepository::new(app.state.db.pool());
    assert_eq!(repo.count_lost_found().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_lost_found_invalid_type() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form =
        lost_found_form("Bob", "Hostel", "Wallet", "Black leather").add_text("type", "Borrowed");
    let response = post_lost_found(&app, form).await;

    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("invalid item type"));
}

#[tokio::test]
async fn test_create_lost_found_missing_field() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new()
        .add_text("name", "Bob")
        .add_text("category", "Hostel")
        .add_text("item", "Wallet");
    let response = post_lost_found(&app, form).await;

    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("description"));
}

#[tokio::test]
async fn test_lost_found_newest_first() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    for i in 1..=3 {
        post_lost_found(
            &app,
            lost_found_form("Bob", "Hostel", &format!("Item {i}"), "desc"),
        )
        .await;
    }

    let body: Value = app.server.get("/lostfound").await.json();
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["item"], "Item 3");
    assert_eq!(posts[1]["item"], "Item 2");
    assert_eq!(posts[2]["item"], "Item 1");

    // One more insert lands at position 0
    post_lost_found(&app, lost_found_form("Bob", "Hostel", "Item 4", "desc")).await;
    let body: Value = app.server.get("/lostfound").await.json();
    let posts = body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 4);
    assert_eq!(posts[0]["item"], "Item 4");
}

// ============================================================================
// Complaints
// ============================================================================

#[tokio::test]
async fn test_create_complaint() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new()
        .add_text("name", "Ann")
        .add_text("issue", "Noise at night");
    let response = app.server.post("/complaint").multipart(form).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/complaint");
    assert_eq!(flash_of(&response).0, FlashKind::Success);

    let body: Value = app.server.get("/complaint").await.json();
    assert_eq!(body["data"][0]["name"], "Ann");
    assert_eq!(body["data"][0]["issue"], "Noise at night");
}

#[tokio::test]
async fn test_create_complaint_empty_name() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new()
        .add_text("name", "")
        .add_text("issue", "noise");
    let response = app.server.post("/complaint").multipart(form).await;

    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("name"));

    // Zero rows added
    let repo = PostRepository::new(app.state.db.pool());
    assert_eq!(repo.count_complaints().await.unwrap(), 0);
}

#[tokio::test]
async fn test_complaint_whitespace_only_issue_rejected() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new()
        .add_text("name", "Ann")
        .add_text("issue", "   ");
    let response = app.server.post("/complaint").multipart(form).await;

    assert_eq!(flash_of(&response).0, FlashKind::Error);

    let repo = PostRepository::new(app.state.db.pool());
    assert_eq!(repo.count_complaints().await.unwrap(), 0);
}

#[tokio::test]
async fn test_complaint_overlong_issue_truncated() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let long_issue = "x".repeat(cobbs::post::MAX_ISSUE_LEN + 500);
    let form = MultipartForm::new()
        .add_text("name", "Ann")
        .add_text("issue", long_issue);
    let response = app.server.post("/complaint").multipart(form).await;

    // Over-length input is truncated, not rejected
    assert_eq!(flash_of(&response).0, FlashKind::Success);

    let repo = PostRepository::new(app.state.db.pool());
    let posts = repo.list_complaints().await.unwrap();
    assert_eq!(posts[0].issue.len(), cobbs::post::MAX_ISSUE_LEN);
}

// ============================================================================
// Help requests
// ============================================================================

#[tokio::test]
async fn test_create_help() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new()
        .add_text("name", "Cleo")
        .add_text("message", "Anyone have a ladder?");
    let response = app.server.post("/help").multipart(form).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(flash_of(&response).0, FlashKind::Success);

    let body: Value = app.server.get("/help").await.json();
    assert_eq!(body["data"][0]["message"], "Anyone have a ladder?");
    assert!(body["data"][0]["share_url"].is_null());
}

#[tokio::test]
async fn test_create_help_missing_message() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    let form = MultipartForm::new().add_text("name", "Cleo");
    let response = app.server.post("/help").multipart(form).await;

    let (kind, message) = flash_of(&response);
    assert_eq!(kind, FlashKind::Error);
    assert!(message.contains("message"));
}

#[tokio::test]
async fn test_listings_are_per_kind() {
    let app = create_test_app().await;
    login_default_member(&app).await;

    post_lost_found(&app, lost_found_form("Bob", "Hostel", "Wallet", "desc")).await;

    let form = MultipartForm::new()
        .add_text("name", "Ann")
        .add_text("issue", "noise");
    app.server.post("/complaint").multipart(form).await;

    let lostfound: Value = app.server.get("/lostfound").await.json();
    let complaints: Value = app.server.get("/complaint").await.json();
    let help: Value = app.server.get("/help").await.json();

    assert_eq!(lostfound["data"].as_array().unwrap().len(), 1);
    assert_eq!(complaints["data"].as_array().unwrap().len(), 1);
    assert_eq!(help["data"].as_array().unwrap().len(), 0);
}
