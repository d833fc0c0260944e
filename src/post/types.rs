//! Post models for COBBS.

use std::fmt;

/// The three post kinds served by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// Lost & found items.
    LostFound,
    /// Complaints.
    Complaint,
    /// Help & sharing requests.
    Help,
}

impl PostKind {
    /// URL path segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::LostFound => "lostfound",
            PostKind::Complaint => "complaint",
            PostKind::Help => "help",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted lost & found post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LostFoundPost {
    /// Unique post ID (strictly increasing).
    pub id: i64,
    /// Poster name.
    pub name: String,
    /// Location category.
    pub category: String,
    /// 'Lost' or 'Found', when supplied.
    pub kind: Option<String>,
    /// The item concerned.
    pub item: String,
    /// Free-text description.
    pub description: String,
    /// Stored filename of the attached image, if any.
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A persisted complaint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComplaintPost {
    pub id: i64,
    pub name: String,
    pub issue: String,
    /// Stored filename of the attached image, if any.
    pub image: Option<String>,
    pub created_at: String,
}

/// A persisted help request.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HelpPost {
    pub id: i64,
    pub name: String,
    pub message: String,
    /// Stored filename of the shared file, if any.
    pub share_file: Option<String>,
    pub created_at: String,
}

/// A comment attached to a post.
///
/// `post_id` is a weak reference; comments have no lifecycle tied to
/// their parent post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub created_at: String,
}

/// Data for creating a lost & found post.
///
/// Fields are expected to be pre-validated by the form validator; the
/// repository trusts its caller.
#[derive(Debug, Clone)]
pub struct NewLostFound {
    pub name: String,
    pub category: String,
    pub kind: Option<String>,
    pub item: String,
    pub description: String,
    pub image: Option<String>,
}

/// Data for creating a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub name: String,
    pub issue: String,
    pub image: Option<String>,
}

/// Data for creating a help request.
#[derive(Debug, Clone)]
pub struct NewHelp {
    pub name: String,
    pub message: String,
    pub share_file: Option<String>,
}
