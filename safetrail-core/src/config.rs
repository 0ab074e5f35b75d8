//! Runtime settings.
//!
//! Hosts load [`SafetySettings`] from JSON (or use the defaults) and hand
//! the pieces to the tracker, scanner and hazard feed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geofence::{Coordinate, Geofence, GeofenceError};
use crate::tracking::WatchOptions;

/// Error type for settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The settings document did not parse.
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// The settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// The configured geofence is invalid.
    #[error(transparent)]
    Geofence(#[from] GeofenceError),

    /// A numeric setting is outside its allowed range.
    #[error("{field} must be in {min}..={max}, got {value}")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Configured value.
        value: u64,
        /// Lowest allowed value.
        min: u64,
        /// Highest allowed value.
        max: u64,
    },
}

/// Result type alias for settings.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunables for a safety monitoring deployment.
///
/// Missing keys in a settings document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    /// Latitude of the designated zone's center.
    pub geofence_center_latitude: f64,
    /// Longitude of the designated zone's center.
    pub geofence_center_longitude: f64,
    /// Radius of the designated zone, in meters.
    pub geofence_radius_meters: f64,
    /// Options for the location watch.
    pub watch: WatchOptions,
    /// Delay of the simulated camera scan, in milliseconds.
    pub scan_delay_ms: u64,
    /// Hazard feed refresh period in minutes (1-60).
    pub news_refresh_minutes: u32,
    /// How many active alerts the compact panel shows.
    pub compact_alert_limit: usize,
    /// Geohash length used in geofence alert locations (1-12).
    pub geohash_precision: usize,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            geofence_center_latitude: 40.7128,
            geofence_center_longitude: -74.0060,
            geofence_radius_meters: 1000.0,
            watch: WatchOptions::default(),
            scan_delay_ms: 2000,
            news_refresh_minutes: 5,
            compact_alert_limit: 3,
            geohash_precision: 7,
        }
    }
}

impl SafetySettings {
    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the
    /// [`validate`](Self::validate) error.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Geofence`] for a bad center or radius, or
    /// [`ConfigError::OutOfRange`] for a numeric setting outside its range.
    pub fn validate(&self) -> Result<()> {
        self.geofence()?;
        check_range(
            "news_refresh_minutes",
            u64::from(self.news_refresh_minutes),
            1,
            60,
        )?;
        check_range("geohash_precision", self.geohash_precision as u64, 1, 12)?;
        Ok(())
    }

    /// The designated zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Geofence`] if the center or radius is invalid.
    pub fn geofence(&self) -> Result<Geofence> {
        let center = Coordinate::new(self.geofence_center_latitude, self.geofence_center_longitude)?;
        Ok(Geofence::new(center, self.geofence_radius_meters)?)
    }

    /// Delay of the simulated camera scan.
    #[must_use]
    pub const fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    /// Hazard feed refresh period.
    #[must_use]
    pub fn news_refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.news_refresh_minutes) * 60)
    }
}

const fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<()> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
