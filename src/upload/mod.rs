//! Upload validation for COBBS.
//!
//! Classifies a submitted file as acceptable or rejected against the
//! configured extension allow-list and size cap, and derives
//! collision-safe on-disk names for accepted uploads.

mod storage;

pub use storage::UploadStorage;

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::config::UploadsConfig;

/// Upload rejection reasons.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The filename has no extension.
    #[error("file has no extension")]
    NoExtension,

    /// The extension is not in the allow-list.
    #[error("file type .{0} is not allowed")]
    ExtensionNotAllowed(String),

    /// The file exceeds the configured size limit.
    #[error("file too large ({size} bytes, limit {max} bytes)")]
    TooLarge {
        /// Submitted size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max: u64,
    },
}

/// An upload that passed validation.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    /// The original filename as submitted.
    pub original_name: String,
    /// The lowercased extension.
    pub extension: String,
}

/// Upload acceptance policy: extension allow-list plus optional size cap.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: HashSet<String>,
    max_size: Option<u64>,
}

impl UploadPolicy {
    /// Create a policy from explicit parts.
    pub fn new(allowed_extensions: &[String], max_size: Option<u64>) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            max_size,
        }
    }

    /// Create a policy from the uploads configuration section.
    pub fn from_config(config: &UploadsConfig) -> Self {
        Self::new(&config.allowed_extensions, config.max_upload_size_bytes())
    }

    /// Validate a submitted file by name and size.
    ///
    /// Accepts only if the filename carries an extension, the extension
    /// (case-insensitive) is allow-listed, and the size does not exceed
    /// the configured maximum (unlimited when none is configured).
    pub fn validate(
        &self,
        filename: &str,
        byte_size: u64,
    ) -> Result<AcceptedUpload, UploadError> {
        let extension = extension_of(filename).ok_or(UploadError::NoExtension)?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::ExtensionNotAllowed(extension));
        }

        if let Some(max) = self.max_size {
            if byte_size > max {
                return Err(UploadError::TooLarge {
                    size: byte_size,
                    max,
                });
            }
        }

        Ok(AcceptedUpload {
            original_name: filename.to_string(),
            extension,
        })
    }
}

/// Extract the lowercased extension of a filename, if any.
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

/// Sanitize an original filename into a bare filesystem entry.
///
/// Path components are stripped and every character outside
/// `[A-Za-z0-9._-]` is replaced with an underscore, so the result can
/// never contain a directory traversal sequence.
pub fn sanitize_file_name(filename: &str) -> String {
    // Keep only the final path component, whatever the client's separator
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derive a collision-safe storage name for an upload.
///
/// The name is a random UUID token joined to the sanitized original
/// name, so two uploads with identical original names never collide.
pub fn derive_storage_name(original_name: &str) -> String {
    let token = Uuid::new_v4().simple();
    format!("{token}_{}", sanitize_file_name(original_name))
}
