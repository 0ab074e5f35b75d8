//! Error types for QR scanning.

use thiserror::Error;

use crate::registry::RegistryError;

/// Error type for scan operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Camera scanning was requested but no camera is attached.
    #[error("No camera available")]
    NoCamera,

    /// Capturing a camera frame failed.
    #[error("Camera capture failed: {0}")]
    Capture(String),

    /// An upload contained no bytes.
    #[error("Uploaded image is empty")]
    EmptyImage,

    /// Manual entry was blank.
    #[error("No data entered")]
    EmptyInput,

    /// The image did not contain a readable QR code.
    #[error("Could not decode QR code: {0}")]
    Undecodable(String),

    /// The decoded text is not a valid tourist profile.
    #[error("Invalid tourist data: {0}")]
    InvalidData(#[from] RegistryError),
}

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
