//! Error types for location tracking.

use thiserror::Error;

/// Errors reported by a location provider.
///
/// All of these surface to the user as "location unavailable". None is
/// fatal; the provider may recover and deliver fixes later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The user or platform denied location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform could not produce a position.
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    /// No position arrived within the watch timeout.
    #[error("Timed out waiting for a location fix")]
    Timeout,

    /// The platform has no location service at all.
    #[error("Location services are not supported")]
    Unsupported,
}

/// Error type for tracker operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// The provider refused or failed to start a watch.
    #[error("Cannot start tracking: {0}")]
    LocationUnavailable(#[from] LocationError),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_error_display() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
        assert_eq!(
            LocationError::Unavailable("no satellites".to_string()).to_string(),
            "Location unavailable: no satellites"
        );
        assert_eq!(
            LocationError::Timeout.to_string(),
            "Timed out waiting for a location fix"
        );
    }

    #[test]
    fn tracking_error_wraps_location_error() {
        let err: TrackingError = LocationError::Unsupported.into();
        assert_eq!(
            err.to_string(),
            "Cannot start tracking: Location services are not supported"
        );
    }
}
