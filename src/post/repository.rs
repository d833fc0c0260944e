//! Post repository for COBBS.
//!
//! Insert and newest-first listing operations for the three post kinds,
//! plus comments. The repository trusts its callers: field validation
//! happens upstream in the form validator.

use sqlx::SqlitePool;

use super::types::{
    Comment, ComplaintPost, HelpPost, LostFoundPost, NewComplaint, NewHelp, NewLostFound,
};
use crate::{CobbsError, Result};

/// Repository for post persistence and listing.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a lost & found post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create_lost_found(&self, new_post: &NewLostFound) -> Result<LostFoundPost> {
        let result = sqlx::query(
            "INSERT INTO lostfound (name, category, kind, item, description, image)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_post.name)
        .bind(&new_post.category)
        .bind(&new_post.kind)
        .bind(&new_post.item)
        .bind(&new_post.description)
        .bind(&new_post.image)
        .execute(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_lost_found(id)
            .await?
            .ok_or_else(|| CobbsError::NotFound("lostfound post".to_string()))
    }

    /// Get a lost & found post by ID.
    pub async fn get_lost_found(&self, id: i64) -> Result<Option<LostFoundPost>> {
        let result = sqlx::query_as::<_, LostFoundPost>(
            "SELECT id, name, category, kind, item, description, image, created_at
             FROM lostfound WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List lost & found posts, newest first.
    pub async fn list_lost_found(&self) -> Result<Vec<LostFoundPost>> {
        let posts = sqlx::query_as::<_, LostFoundPost>(
            "SELECT id, name, category, kind, item, description, image, created_at
             FROM lostfound ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Count lost & found posts.
    pub async fn count_lost_found(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lostfound")
            .fetch_one(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Insert a complaint.
    pub async fn create_complaint(&self, new_post: &NewComplaint) -> Result<ComplaintPost> {
        let result = sqlx::query("INSERT INTO complaint (name, issue, image) VALUES (?, ?, ?)")
            .bind(&new_post.name)
            .bind(&new_post.issue)
            .bind(&new_post.image)
            .execute(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_complaint(id)
            .await?
            .ok_or_else(|| CobbsError::NotFound("complaint".to_string()))
    }

    /// Get a complaint by ID.
    pub async fn get_complaint(&self, id: i64) -> Result<Option<ComplaintPost>> {
        let result = sqlx::query_as::<_, ComplaintPost>(
            "SELECT id, name, issue, image, created_at FROM complaint WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List complaints, newest first.
    pub async fn list_complaints(&self) -> Result<Vec<ComplaintPost>> {
        let posts = sqlx::query_as::<_, ComplaintPost>(
            "SELECT id, name, issue, image, created_at FROM complaint ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Count complaints.
    pub async fn count_complaints(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM complaint")
            .fetch_one(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Insert a help request.
    pub async fn create_help(&self, new_post: &NewHelp) -> Result<HelpPost> {
        let result = sqlx::query("INSERT INTO help (name, message, share_file) VALUES (?, ?, ?)")
            .bind(&new_post.name)
            .bind(&new_post.message)
            .bind(&new_post.share_file)
            .execute(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_help(id)
            .await?
            .ok_or_else(|| CobbsError::NotFound("help post".to_string()))
    }

    /// Get a help request by ID.
    pub async fn get_help(&self, id: i64) -> Result<Option<HelpPost>> {
        let result = sqlx::query_as::<_, HelpPost>(
            "SELECT id, name, message, share_file, created_at FROM help WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List help requests, newest first.
    pub async fn list_help(&self) -> Result<Vec<HelpPost>> {
        let posts = sqlx::query_as::<_, HelpPost>(
            "SELECT id, name, message, share_file, created_at FROM help ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Count help requests.
    pub async fn count_help(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM help")
            .fetch_one(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Add a comment to a post.
    ///
    /// `post_id` is a weak reference; no existence check is performed.
    pub async fn create_comment(&self, post_id: i64, body: &str) -> Result<Comment> {
        let result = sqlx::query("INSERT INTO comments (post_id, body) VALUES (?, ?)")
            .bind(post_id)
            .bind(body)
            .execute(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, body, created_at FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        comment.ok_or_else(|| CobbsError::NotFound("comment".to_string()))
    }

    /// List comments for a post, oldest first.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, body, created_at FROM comments WHERE post_id = ? ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(comments)
    }
}
