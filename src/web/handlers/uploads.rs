//! Stored file download handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::CobbsError;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are removed (CR and LF would allow header
/// injection), quotes and backslashes are escaped, and non-ASCII names
/// get an RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// GET /uploads/:name - Download a stored file.
///
/// Stored names are bare filesystem entries by construction; anything
/// that still looks like a path is refused outright.
pub async fn download_upload(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response<Body>, ApiError> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiError::bad_request("Invalid file name"));
    }

    let content = state.storage.load(&name).map_err(|e| match e {
        CobbsError::NotFound(_) => ApiError::not_found("File not found"),
        other => {
            tracing::error!("Failed to load file: {}", other);
            ApiError::internal("Failed to load file")
        }
    })?;

    let content_type = mime_guess::from_path(&name)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition_header(&name))
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header_simple_ascii() {
        let result = content_disposition_header("document.pdf");
        assert_eq!(result, "attachment; filename=\"document.pdf\"");
    }

    #[test]
    fn test_content_disposition_header_with_spaces() {
        let result = content_disposition_header("my document.pdf");
        assert_eq!(result, "attachment; filename=\"my document.pdf\"");
    }

    #[test]
    fn test_content_disposition_header_non_ascii() {
        let result = content_disposition_header("фото.png");
        assert!(result.starts_with("attachment; filename=\""));
        assert!(result.contains("filename*=UTF-8''"));
    }

    #[test]
    fn test_content_disposition_header_double_quote() {
        let result = content_disposition_header("test\"file.png");
        assert!(result.contains("filename=\"test_file.png\""));
        assert!(result.contains("%22"));
    }

    #[test]
    fn test_content_disposition_header_control_characters() {
        // Header injection attempt
        let result = content_disposition_header("test\r\nX-Injected: bad.png");
        assert!(!result.contains('\r'));
        assert!(!result.contains('\n'));
        assert!(result.starts_with("attachment; filename="));
    }
}
