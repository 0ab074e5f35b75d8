//! Geofence data types.

use serde::{Deserialize, Serialize};

use super::error::{GeofenceError, Result};

/// Longest geohash the encoder supports.
const MAX_GEOHASH_LEN: usize = 12;

/// A validated latitude/longitude pair in degrees.
///
/// Construction always goes through [`Coordinate::new`], including
/// deserialization, so a `Coordinate` value is always in range:
///
/// | Axis      | Range            |
/// |-----------|------------------|
/// | Latitude  | -90.0 ..= 90.0   |
/// | Longitude | -180.0 ..= 180.0 |
///
/// # Example
///
/// ```
/// use safetrail_core::geofence::Coordinate;
///
/// let nyc = Coordinate::new(40.7128, -74.0060).unwrap();
/// assert_eq!(nyc.latitude(), 40.7128);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated wire form of a [`Coordinate`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidCoordinate`] if either axis is NaN,
    /// infinite, or outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        if lat_ok && lon_ok {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(GeofenceError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Encodes this coordinate as a geohash of `len` characters.
    ///
    /// `len` is clamped to `1..=12`. Each extra character narrows the cell
    /// roughly 5x; 7 characters is about street level (±76 m).
    ///
    /// # Examples
    ///
    /// ```
    /// use safetrail_core::geofence::Coordinate;
    ///
    /// let c = Coordinate::new(37.7749, -122.4194).unwrap();
    /// assert_eq!(c.geohash(5).len(), 5);
    /// assert!(c.geohash(8).starts_with(&c.geohash(5)));
    /// ```
    #[must_use]
    pub fn geohash(&self, len: usize) -> String {
        let len = len.clamp(1, MAX_GEOHASH_LEN);
        geohash::encode(
            geohash::Coord {
                x: self.longitude,
                y: self.latitude,
            },
            len,
        )
        .unwrap_or_default()
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeofenceError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A circular safe area: a center and an inclusive radius in meters.
///
/// A geofence is fixed for the lifetime of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    center: Coordinate,
    radius_meters: f64,
}

impl Geofence {
    /// Creates a geofence.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidRadius`] if the radius is negative,
    /// NaN, or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use safetrail_core::geofence::{Coordinate, Geofence};
    ///
    /// let center = Coordinate::new(40.7128, -74.0060).unwrap();
    /// let fence = Geofence::new(center, 1_000.0).unwrap();
    /// assert_eq!(fence.radius_meters(), 1_000.0);
    ///
    /// assert!(Geofence::new(center, -1.0).is_err());
    /// ```
    pub fn new(center: Coordinate, radius_meters: f64) -> Result<Self> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(GeofenceError::InvalidRadius(radius_meters));
        }
        Ok(Self {
            center,
            radius_meters,
        })
    }

    /// Center of the fence.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius of the fence in meters.
    #[must_use]
    pub const fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}

/// Whether the tracked subject is inside the active geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// No valid coordinate has been evaluated in this session yet.
    #[default]
    Unresolved,
    /// Last evaluated coordinate was within the radius.
    Inside,
    /// Last evaluated coordinate was beyond the radius.
    Outside,
}

impl MembershipState {
    /// Maps an evaluation result to a resolved state.
    #[must_use]
    pub const fn from_inside(inside: bool) -> Self {
        if inside {
            Self::Inside
        } else {
            Self::Outside
        }
    }

    /// Returns true only for [`MembershipState::Inside`].
    #[must_use]
    pub const fn is_inside(self) -> bool {
        matches!(self, Self::Inside)
    }

    /// Returns false while unresolved.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Converts to string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }
}

/// Result of evaluating one coordinate against a geofence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the coordinate is within the radius (inclusive).
    pub inside: bool,
    /// True exactly on an inside to outside transition.
    pub crossed_out: bool,
    /// Great-circle distance from the fence center.
    pub distance_meters: f64,
}
