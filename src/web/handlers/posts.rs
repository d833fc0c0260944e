//! Post submission and listing handlers.
//!
//! POST handlers walk the submission through the session gate, the form
//! validator, the upload validator and the repository, answering with a
//! flash message plus redirect. GET handlers return the newest-first
//! listing as JSON for the front-end to render.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::post::{
    validate_complaint, validate_help, validate_lost_found, NewComplaint, NewHelp, NewLostFound,
    PostKind, PostRepository,
};
use crate::web::dto::{ApiResponse, ComplaintResponse, HelpResponse, LostFoundResponse};
use crate::web::error::ApiError;
use crate::web::flash::{flash_redirect, FlashKind};
use crate::web::handlers::AppState;
use crate::web::middleware::SessionUser;

/// A parsed multipart submission: text fields plus an optional file.
struct Submission {
    fields: HashMap<String, String>,
    file: Option<(String, Vec<u8>)>,
}

/// Read a multipart form, collecting text fields and the named file field.
///
/// A file part without a filename (the browser sends one when no file
/// was chosen) counts as no file.
async fn read_submission(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<Submission, String> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid form data: {e}"))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == file_field {
            let filename = field.file_name().unwrap_or("").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| format!("Failed to read file: {e}"))?;
            if !filename.is_empty() && !content.is_empty() {
                file = Some((filename, content.to_vec()));
            }
        } else if !name.is_empty() {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Invalid field '{name}': {e}"))?;
            fields.insert(name, value);
        }
    }

    Ok(Submission { fields, file })
}

/// Outcome of storing an optional attachment.
struct StoredAttachment {
    /// Stored filename, when the attachment was accepted and written.
    stored_name: Option<String>,
    /// Rejection message, when the attachment was refused.
    rejection: Option<String>,
}

/// Validate and store an optional attachment.
///
/// A rejected attachment never blocks the post: the post proceeds with
/// a null file reference and the rejection is reported to the user.
fn store_attachment(
    state: &AppState,
    file: Option<(String, Vec<u8>)>,
) -> Result<StoredAttachment, String> {
    let (filename, content) = match file {
        Some(f) => f,
        None => {
            return Ok(StoredAttachment {
                stored_name: None,
                rejection: None,
            })
        }
    };

    match state.policy.validate(&filename, content.len() as u64) {
        Ok(_) => {
            let stored_name = state
                .storage
                .save(&content, &filename)
                .map_err(|e| {
                    tracing::error!("Failed to store upload: {}", e);
                    "Failed to store the attached file".to_string()
                })?;
            Ok(StoredAttachment {
                stored_name: Some(stored_name),
                rejection: None,
            })
        }
        Err(e) => Ok(StoredAttachment {
            stored_name: None,
            rejection: Some(e.to_string()),
        }),
    }
}

/// Flash the outcome of a successful post creation.
fn created_flash(
    jar: CookieJar,
    kind: PostKind,
    success_message: &str,
    rejection: Option<String>,
) -> (CookieJar, Redirect) {
    let location = format!("/{kind}");
    match rejection {
        None => flash_redirect(jar, FlashKind::Success, success_message, &location),
        Some(reason) => flash_redirect(
            jar,
            FlashKind::Error,
            &format!("Attachment rejected ({reason}); posted without it"),
            &location,
        ),
    }
}

/// POST /lostfound - Submit a lost & found item.
pub async fn create_lost_found(
    State(state): State<Arc<AppState>>,
    SessionUser(_session): SessionUser,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Redirect) {
    let kind = PostKind::LostFound;
    let location = format!("/{kind}");

    let submission = match read_submission(multipart, "image").await {
        Ok(s) => s,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let clean = match validate_lost_found(&submission.fields) {
        Ok(c) => c,
        Err(e) => return flash_redirect(jar, FlashKind::Error, &e.to_string(), &location),
    };

    let attachment = match store_attachment(&state, submission.file) {
        Ok(a) => a,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let repo = PostRepository::new(state.db.pool());
    let new_post = NewLostFound {
        name: clean.name,
        category: clean.category.as_str().to_string(),
        kind: clean.item_type.map(|t| t.as_str().to_string()),
        item: clean.item,
        description: clean.description,
        image: attachment.stored_name.clone(),
    };

    match repo.create_lost_found(&new_post).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, "Lost & found item posted");
            created_flash(jar, kind, "Item posted successfully!", attachment.rejection)
        }
        Err(e) => {
            tracing::error!("Failed to insert lostfound post: {}", e);
            // The row never landed; remove the stored file
            if let Some(ref stored) = attachment.stored_name {
                let _ = state.storage.delete(stored);
            }
            flash_redirect(jar, FlashKind::Error, "Failed to save post", &location)
        }
    }
}

/// POST /complaint - Submit a complaint.
pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    SessionUser(_session): SessionUser,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Redirect) {
    let kind = PostKind::Complaint;
    let location = format!("/{kind}");

    let submission = match read_submission(multipart, "image").await {
        Ok(s) => s,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let clean = match validate_complaint(&submission.fields) {
        Ok(c) => c,
        Err(e) => return flash_redirect(jar, FlashKind::Error, &e.to_string(), &location),
    };

    let attachment = match store_attachment(&state, submission.file) {
        Ok(a) => a,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let repo = PostRepository::new(state.db.pool());
    let new_post = NewComplaint {
        name: clean.name,
        issue: clean.issue,
        image: attachment.stored_name.clone(),
    };

    match repo.create_complaint(&new_post).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, "Complaint submitted");
            created_flash(jar, kind, "Complaint submitted!", attachment.rejection)
        }
        Err(e) => {
            tracing::error!("Failed to insert complaint: {}", e);
            if let Some(ref stored) = attachment.stored_name {
                let _ = state.storage.delete(stored);
            }
            flash_redirect(jar, FlashKind::Error, "Failed to save post", &location)
        }
    }
}

/// POST /help - Submit a help request.
pub async fn create_help(
    State(state): State<Arc<AppState>>,
    SessionUser(_session): SessionUser,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Redirect) {
    let kind = PostKind::Help;
    let location = format!("/{kind}");

    let submission = match read_submission(multipart, "share_file").await {
        Ok(s) => s,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let clean = match validate_help(&submission.fields) {
        Ok(c) => c,
        Err(e) => return flash_redirect(jar, FlashKind::Error, &e.to_string(), &location),
    };

    let attachment = match store_attachment(&state, submission.file) {
        Ok(a) => a,
        Err(msg) => return flash_redirect(jar, FlashKind::Error, &msg, &location),
    };

    let repo = PostRepository::new(state.db.pool());
    let new_post = NewHelp {
        name: clean.name,
        message: clean.message,
        share_file: attachment.stored_name.clone(),
    };

    match repo.create_help(&new_post).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, "Help request posted");
            created_flash(jar, kind, "Help request posted!", attachment.rejection)
        }
        Err(e) => {
            tracing::error!("Failed to insert help post: {}", e);
            if let Some(ref stored) = attachment.stored_name {
                let _ = state.storage.delete(stored);
            }
            flash_redirect(jar, FlashKind::Error, "Failed to save post", &location)
        }
    }
}

/// GET /lostfound - List lost & found items, newest first.
pub async fn list_lost_found(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LostFoundResponse>>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list_lost_found().await.map_err(|e| {
        tracing::error!("Failed to list lostfound posts: {}", e);
        ApiError::internal("Failed to list posts")
    })?;

    Ok(Json(ApiResponse::new(
        posts.into_iter().map(LostFoundResponse::from).collect(),
    )))
}

/// GET /complaint - List complaints, newest first.
pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ComplaintResponse>>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list_complaints().await.map_err(|e| {
        tracing::error!("Failed to list complaints: {}", e);
        ApiError::internal("Failed to list posts")
    })?;

    Ok(Json(ApiResponse::new(
        posts.into_iter().map(ComplaintResponse::from).collect(),
    )))
}

/// GET /help - List help requests, newest first.
pub async fn list_help(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<HelpResponse>>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list_help().await.map_err(|e| {
        tracing::error!("Failed to list help posts: {}", e);
        ApiError::internal("Failed to list posts")
    })?;

    Ok(Json(ApiResponse::new(
        posts.into_iter().map(HelpResponse::from).collect(),
    )))
}
