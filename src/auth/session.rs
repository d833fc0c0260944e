//! Session management for COBBS.
//!
//! This module provides the server-side session store (token to identity
//! mapping with TTL) and login attempt rate limiting. The store is an
//! explicit value injected into the web layer, not ambient global state.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::User;

/// Session-related errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session has expired.
    #[error("session expired")]
    SessionExpired,

    /// Session not found.
    #[error("session not found")]
    SessionNotFound,
}

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Maximum login attempts before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Lockout duration (5 minutes).
pub const LOCKOUT_DURATION_SECS: u64 = 5 * 60;

/// An authenticated session for a logged-in user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session token (UUID v4).
    pub token: String,
    /// User ID associated with this session.
    pub user_id: i64,
    /// Username associated with this session.
    pub username: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn new(user_id: i64, username: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or_default();

        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            username: username.to_string(),
            created_at: now,
            expires_at,
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Result of a login attempt rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    /// Login attempt is allowed.
    Allowed,
    /// Account is locked for the specified duration.
    Locked(Duration),
}

/// Login attempt rate limiter.
///
/// Tracks failed login attempts per username and enforces lockout
/// after too many failures.
#[derive(Debug)]
pub struct LoginLimiter {
    /// Failed attempts per username: (username -> list of attempt times).
    attempts: HashMap<String, Vec<Instant>>,
    /// Maximum attempts before lockout.
    max_attempts: u32,
    /// Time window for counting attempts.
    window: Duration,
    /// Lockout duration after exceeding max attempts.
    lockout: Duration,
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginLimiter {
    /// Create a new limiter with default settings.
    pub fn new() -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts: MAX_LOGIN_ATTEMPTS,
            window: Duration::from_secs(LOCKOUT_DURATION_SECS),
            lockout: Duration::from_secs(LOCKOUT_DURATION_SECS),
        }
    }

    /// Create a limiter with custom settings.
    pub fn with_config(max_attempts: u32, window_secs: u64, lockout_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window: Duration::from_secs(window_secs),
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    /// Check if a login attempt is allowed for the given username.
    pub fn check(&mut self, username: &str) -> LimitResult {
        let now = Instant::now();
        let key = username.to_lowercase();

        let attempts = self.attempts.entry(key).or_default();

        // Remove expired attempts
        attempts.retain(|t| now.duration_since(*t) < self.window);

        if attempts.len() >= self.max_attempts as usize {
            if let Some(oldest) = attempts.first() {
                let elapsed = now.duration_since(*oldest);
                if elapsed < self.lockout {
                    let remaining = self.lockout - elapsed;
                    return LimitResult::Locked(remaining);
                }
                // Lockout expired, clear attempts
                attempts.clear();
            }
        }

        LimitResult::Allowed
    }

    /// Record a failed login attempt.
    pub fn record_failure(&mut self, username: &str) {
        let key = username.to_lowercase();
        let now = Instant::now();

        let attempts = self.attempts.entry(key).or_default();
        attempts.retain(|t| now.duration_since(*t) < self.window);
        attempts.push(now);

        debug!(
            username = %username,
            attempt_count = attempts.len(),
            "Recorded failed login attempt"
        );
    }

    /// Clear all attempts for a username (call on successful login).
    pub fn clear(&mut self, username: &str) {
        let key = username.to_lowercase();
        self.attempts.remove(&key);
    }

    /// Clean up expired entries to prevent memory growth.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        self.attempts.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < self.window);
            !attempts.is_empty()
        });
    }
}

/// Server-side session store: token to identity mapping with TTL.
///
/// Shared across request handlers; interior locking keeps the store
/// usable from `&self`.
#[derive(Debug)]
pub struct SessionStore {
    /// Active sessions by token.
    sessions: RwLock<HashMap<String, Session>>,
    /// Login attempt limiter.
    limiter: Mutex<LoginLimiter>,
    /// Session time-to-live.
    ttl: Duration,
}

impl SessionStore {
    /// Create a new session store with the given TTL in seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limiter: Mutex::new(LoginLimiter::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Check the login rate limit for a username.
    pub fn check_limit(&self, username: &str) -> LimitResult {
        self.limiter.lock().unwrap().check(username)
    }

    /// Record a failed login attempt for a username.
    pub fn record_failure(&self, username: &str) {
        self.limiter.lock().unwrap().record_failure(username);
    }

    /// Clear recorded failures for a username.
    pub fn clear_failures(&self, username: &str) {
        self.limiter.lock().unwrap().clear(username);
    }

    /// Create a new session for an authenticated user.
    pub fn create(&self, user: &User) -> Session {
        let session = Session::new(user.id, &user.username, self.ttl);
        self.sessions
            .write()
            .unwrap()
            .insert(session.token.clone(), session.clone());

        info!(
            username = %user.username,
            user_id = user.id,
            "Session created"
        );

        session
    }

    /// Resolve a token to its session, refusing and removing expired ones.
    pub fn resolve(&self, token: &str) -> Result<Session, SessionError> {
        {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(token) {
                Some(session) if !session.is_expired() => return Ok(session.clone()),
                Some(_) => {}
                None => return Err(SessionError::SessionNotFound),
            }
        }

        // Expired: remove under the write lock
        self.sessions.write().unwrap().remove(token);
        Err(SessionError::SessionExpired)
    }

    /// Invalidate a session by token.
    ///
    /// Returns true if a session was removed.
    pub fn logout(&self, token: &str) -> bool {
        if let Some(session) = self.sessions.write().unwrap().remove(token) {
            info!(user_id = session.user_id, "Session logged out");
            true
        } else {
            debug!("Logout: session not found");
            false
        }
    }

    /// Remove all expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        let removed = before - sessions.len();

        if removed > 0 {
            warn!(count = removed, "Removed expired sessions");
        }
        self.limiter.lock().unwrap().cleanup();

        removed
    }

    /// Number of currently active sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}
