//! Error types for geofence evaluation.

use thiserror::Error;

/// Error type for geofence operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeofenceError {
    /// Latitude or longitude is non-finite or outside its valid range.
    #[error("Invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// The rejected latitude.
        latitude: f64,
        /// The rejected longitude.
        longitude: f64,
    },

    /// Geofence radius is negative or non-finite.
    #[error("Invalid geofence radius: {0} m")]
    InvalidRadius(f64),
}

/// Result type alias for geofence operations.
pub type Result<T> = std::result::Result<T, GeofenceError>;
