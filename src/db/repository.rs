//! User repository for COBBS.
//!
//! This module provides CRUD operations for users in the database.

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{CobbsError, Result};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .execute(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CobbsError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, created_at, last_login
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password, created_at, last_login
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| CobbsError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Update the last login timestamp for a user.
    pub async fn update_last_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Check if a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.pool)
                .await
                .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(exists.0)
    }

    /// Check if an email address is already taken.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(self.pool)
            .await
            .map_err(|e| CobbsError::Database(e.to_string()))?;
        Ok(exists.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let new_user = NewUser::new("testuser", "test@example.com", "hashedpw");
        let user = repo.create(&new_user).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "test@example.com");
        assert!(user.last_login.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("testuser", "a@x.com", "pw"))
            .await
            .unwrap();

        let result = repo
            .create(&NewUser::new("testuser", "b@y.com", "pw"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("user1", "same@x.com", "pw"))
            .await
            .unwrap();

        let result = repo.create(&NewUser::new("user2", "same@x.com", "pw")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let created = repo
            .create(&NewUser::new("testuser", "t@x.com", "pw"))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().username, "testuser");

        let not_found = repo.get_by_id(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("testuser", "t@x.com", "pw"))
            .await
            .unwrap();

        let found = repo.get_by_username("testuser").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().email, "t@x.com");

        let not_found = repo.get_by_username("nonexistent").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(&NewUser::new("testuser", "t@x.com", "pw"))
            .await
            .unwrap();
        assert!(user.last_login.is_none());

        repo.update_last_login(user.id).await.unwrap();

        let updated = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert!(updated.last_login.is_some());
    }

    #[tokio::test]
    async fn test_count() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&NewUser::new("user1", "1@x.com", "pw"))
            .await
            .unwrap();
        repo.create(&NewUser::new("user2", "2@x.com", "pw"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_username_exists() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.username_exists("testuser").await.unwrap());

        repo.create(&NewUser::new("testuser", "t@x.com", "pw"))
            .await
            .unwrap();

        assert!(repo.username_exists("testuser").await.unwrap());
        assert!(!repo.username_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_email_exists() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.email_exists("t@x.com").await.unwrap());

        repo.create(&NewUser::new("testuser", "t@x.com", "pw"))
            .await
            .unwrap();

        assert!(repo.email_exists("t@x.com").await.unwrap());
        assert!(!repo.email_exists("other@x.com").await.unwrap());
    }
}
