//! Scan request and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::TouristProfile;

/// Where the QR content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSource {
    /// Capture a frame from the device camera.
    Camera,
    /// An uploaded image file.
    Upload(Vec<u8>),
    /// Payload text typed or pasted by the agent.
    ManualEntry(String),
}

impl ScanSource {
    /// The method this source corresponds to.
    #[must_use]
    pub const fn method(&self) -> ScanMethod {
        match self {
            Self::Camera => ScanMethod::Camera,
            Self::Upload(_) => ScanMethod::Upload,
            Self::ManualEntry(_) => ScanMethod::ManualEntry,
        }
    }
}

/// How a profile was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMethod {
    /// Device camera.
    Camera,
    /// Uploaded image.
    Upload,
    /// Typed payload.
    ManualEntry,
}

impl ScanMethod {
    /// Converts to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Upload => "upload",
            Self::ManualEntry => "manual_entry",
        }
    }
}

/// A successfully scanned tourist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// The decoded, validated profile.
    pub profile: TouristProfile,
    /// Which method produced it.
    pub method: ScanMethod,
    /// When the scan completed.
    pub scanned_at: DateTime<Utc>,
}

impl ScanOutcome {
    pub(crate) fn new(profile: TouristProfile, method: ScanMethod) -> Self {
        Self {
            profile,
            method,
            scanned_at: Utc::now(),
        }
    }
}
