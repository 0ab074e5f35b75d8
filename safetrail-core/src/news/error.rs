//! Error types for the hazard feed.

use thiserror::Error;

/// Error type for hazard feed operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// The feed source could not be reached.
    #[error("Hazard feed unavailable: {0}")]
    Unavailable(String),

    /// The feed returned data that could not be parsed.
    #[error("Invalid feed data: {0}")]
    InvalidData(String),

    /// A refresh period of zero was requested.
    #[error("Refresh period must be non-zero")]
    ZeroRefreshPeriod,
}

/// Result type alias for hazard feed operations.
pub type Result<T> = std::result::Result<T, NewsError>;
