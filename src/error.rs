//! Error types for COBBS.

use thiserror::Error;

/// Common error type for COBBS.
#[derive(Error, Debug)]
pub enum CobbsError {
    /// Database error.
    ///
    /// This is a generic database error that wraps errors from sqlx.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for CobbsError {
    fn from(e: sqlx::Error) -> Self {
        CobbsError::Database(e.to_string())
    }
}

/// Result type alias for COBBS operations.
pub type Result<T> = std::result::Result<T, CobbsError>;
