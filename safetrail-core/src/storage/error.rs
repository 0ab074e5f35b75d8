//! Error types for local storage.

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// `SQLite` error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned.
    #[error("Failed to acquire database lock: {0}")]
    Lock(String),

    /// No record with the given id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored row could not be decoded.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
