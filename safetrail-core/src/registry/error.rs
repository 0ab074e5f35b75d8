//! Error types for the tourist registry.

use thiserror::Error;

/// Error type for registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required registration field is blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Email does not look like an address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Unknown status string.
    #[error("Invalid tourist status: {0}")]
    InvalidStatus(String),

    /// QR payload is not a tourist profile.
    #[error("Invalid QR payload: {0}")]
    InvalidPayload(String),

    /// QR payload could not be produced.
    #[error("Failed to encode QR payload: {0}")]
    Encoding(String),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display() {
        let err = RegistryError::MissingField("passport");
        assert_eq!(err.to_string(), "Missing required field: passport");
    }

    #[test]
    fn invalid_email_display() {
        let err = RegistryError::InvalidEmail("nobody".to_string());
        assert_eq!(err.to_string(), "Invalid email address: nobody");
    }
}
