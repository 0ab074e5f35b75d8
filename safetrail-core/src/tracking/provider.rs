//! Location provider abstraction.
//!
//! A provider is an external collaborator (GPS, browser geolocation, a
//! simulator) that pushes fixes into a [`LocationSink`] on its own cadence.
//! Retry and backoff belong to the provider.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LocationError;
use super::tracker::LocationSink;
use crate::geofence::{self, Coordinate};

/// A raw position reading as delivered by a provider.
///
/// Fields are not validated; the tracker converts the fix into a
/// [`Coordinate`] and rejects out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reported horizontal accuracy in meters, if known.
    pub accuracy_meters: Option<f64>,
    /// When the reading was taken (UTC).
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Creates a fix timestamped now.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the reported accuracy.
    #[must_use]
    pub const fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_meters = Some(meters);
        self
    }

    /// Validates this fix into a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`geofence::GeofenceError::InvalidCoordinate`] if the reading
    /// is out of range or non-finite.
    pub fn coordinate(&self) -> geofence::Result<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Options passed to the provider when a watch is registered.
///
/// Defaults mirror a typical mobile geolocation watch: high accuracy,
/// cached fixes up to 30 s old accepted, 27 s per-fix timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Request the most accurate source available (GPS over network).
    pub high_accuracy: bool,
    /// Oldest cached fix the provider may hand out, in milliseconds.
    pub maximum_age_ms: u64,
    /// How long the provider may wait for a fix, in milliseconds.
    pub timeout_ms: u64,
}

impl WatchOptions {
    /// Oldest acceptable cached fix.
    #[must_use]
    pub const fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }

    /// Per-fix timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: 30_000,
            timeout_ms: 27_000,
        }
    }
}

/// Handle identifying one registered watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub u64);

/// A source of location fixes.
///
/// Implementations call [`LocationSink::deliver`] for every fix or error
/// until [`clear_watch`](Self::clear_watch) is called for that watch.
pub trait LocationProvider: Send + Sync {
    /// Registers a watch that delivers into `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationError`] if location access is denied or the
    /// platform has no location service.
    fn watch(&self, options: &WatchOptions, sink: LocationSink) -> Result<WatchId, LocationError>;

    /// Cancels a watch. Unknown ids are ignored.
    fn clear_watch(&self, id: WatchId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_options_defaults() {
        let options = WatchOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.maximum_age(), Duration::from_secs(30));
        assert_eq!(options.timeout(), Duration::from_secs(27));
    }

    #[test]
    fn fix_converts_to_coordinate() {
        let fix = LocationFix::new(48.8584, 2.2945).with_accuracy(12.0);
        assert_eq!(fix.accuracy_meters, Some(12.0));

        let coordinate = fix.coordinate().unwrap();
        assert_eq!(coordinate.latitude(), 48.8584);
    }

    #[test]
    fn fix_with_bad_latitude_is_rejected() {
        let fix = LocationFix::new(123.0, 2.0);
        assert!(fix.coordinate().is_err());
    }
}
