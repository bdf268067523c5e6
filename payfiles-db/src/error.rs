//! Structured error types for payfiles-db.
//!
//! Uses `thiserror` so the binary (payfiles-cli) can wrap these in `anyhow`
//! while library consumers still match on variants.

use thiserror::Error;

/// Error type for every fallible facade operation
#[derive(Error, Debug)]
pub enum DbError {
    /// Anything the driver or pool reports: connectivity, malformed SQL,
    /// constraint violations, type mismatches, undecodable cells.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Caller supplied input the operation refuses before touching the database
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be resolved
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for payfiles-db operations
pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True for errors raised by input validation rather than the database
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
