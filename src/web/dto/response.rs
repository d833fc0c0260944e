//! Response DTOs for the COBBS web layer.

use serde::Serialize;

use crate::post::{ComplaintPost, HelpPost, LostFoundPost};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Service identity response for the entry endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// Crate version.
    pub version: String,
}

fn upload_url(stored_name: &Option<String>) -> Option<String> {
    stored_name.as_ref().map(|n| format!("/uploads/{n}"))
}

/// Lost & found post in listings.
#[derive(Debug, Serialize)]
pub struct LostFoundResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// 'Lost' or 'Found', when supplied.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub item: String,
    pub description: String,
    /// Download URL of the attached image, if any.
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<LostFoundPost> for LostFoundResponse {
    fn from(post: LostFoundPost) -> Self {
        Self {
            id: post.id,
            name: post.name,
            category: post.category,
            item_type: post.kind,
            item: post.item,
            description: post.description,
            image_url: upload_url(&post.image),
            created_at: post.created_at,
        }
    }
}

/// Complaint in listings.
#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub id: i64,
    pub name: String,
    pub issue: String,
    /// Download URL of the attached image, if any.
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<ComplaintPost> for ComplaintResponse {
    fn from(post: ComplaintPost) -> Self {
        Self {
            id: post.id,
            name: post.name,
            issue: post.issue,
            image_url: upload_url(&post.image),
            created_at: post.created_at,
        }
    }
}

/// Help request in listings.
#[derive(Debug, Serialize)]
pub struct HelpResponse {
    pub id: i64,
    pub name: String,
    pub message: String,
    /// Download URL of the shared file, if any.
    pub share_url: Option<String>,
    pub created_at: String,
}

impl From<HelpPost> for HelpResponse {
    fn from(post: HelpPost) -> Self {
        Self {
            id: post.id,
            name: post.name,
            message: post.message,
            share_url: upload_url(&post.share_file),
            created_at: post.created_at,
        }
    }
}
