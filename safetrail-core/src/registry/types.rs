//! Tourist registry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::{RegistryError, Result};

/// Registration details a tourist fills in.
///
/// This is also the content of the tourist's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouristProfile {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Passport number.
    pub passport: String,
    /// Destination, e.g. "Paris, France".
    pub destination: String,
    /// Planned trip length, free text, e.g. "7 days".
    pub duration: String,
}

impl TouristProfile {
    /// Checks that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingField`] naming the first blank field,
    /// or [`RegistryError::InvalidEmail`] if the email has no `@`.
    ///
    /// # Examples
    ///
    /// ```
    /// use safetrail_core::registry::TouristProfile;
    ///
    /// let mut profile = TouristProfile {
    ///     name: "John Smith".into(),
    ///     email: "john.smith@email.com".into(),
    ///     phone: "+1-555-0123".into(),
    ///     passport: "AB123456789".into(),
    ///     destination: "Paris, France".into(),
    ///     duration: "7 days".into(),
    /// };
    /// assert!(profile.validate().is_ok());
    ///
    /// profile.phone = "   ".into();
    /// assert!(profile.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("passport", &self.passport),
            ("destination", &self.destination),
            ("duration", &self.duration),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(RegistryError::MissingField(field));
            }
        }

        if !self.email.contains('@') {
            return Err(RegistryError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }

    /// Derives the stable identifier for this traveller.
    #[must_use]
    pub fn tourist_id(&self) -> TouristId {
        TouristId::derive(&self.passport, &self.email)
    }
}

/// Stable tourist identifier.
///
/// Derived from the normalized passport number and email so the same
/// traveller always gets the same id, without exposing either value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouristId(String);

impl TouristId {
    /// Number of digest bytes kept in the id.
    const ID_BYTES: usize = 16;

    /// Derives an id from passport number and email.
    ///
    /// Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn derive(passport: &str, email: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(passport.trim().to_uppercase().as_bytes());
        hasher.update([0u8]);
        hasher.update(email.trim().to_lowercase().as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..Self::ID_BYTES]))
    }

    /// Wraps an id read back from storage.
    #[must_use]
    pub fn from_hex(hex_id: impl Into<String>) -> Self {
        Self(hex_id.into())
    }

    /// Hex form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TouristId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Safety status shown on the agent dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouristStatus {
    /// Inside the designated area.
    #[default]
    Safe,
    /// Needs attention (e.g. near a boundary).
    Warning,
    /// Outside the area or in distress.
    Alert,
}

impl TouristStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Alert => "alert",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "safe" => Some(Self::Safe),
            "warning" => Some(Self::Warning),
            "alert" => Some(Self::Alert),
            _ => None,
        }
    }
}

/// A registered tourist as the agent dashboard sees them.
///
/// Contact details and passport stay in the QR payload; the dashboard
/// record only carries what agents need to triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedTourist {
    /// Stable id.
    pub id: TouristId,
    /// Display name.
    pub name: String,
    /// Destination.
    pub destination: String,
    /// Planned trip length.
    pub duration: String,
    /// Current safety status.
    pub status: TouristStatus,
    /// Human-readable last known location, e.g. "Eiffel Tower Area".
    pub location: String,
    /// When the tourist registered.
    pub registered_at: DateTime<Utc>,
    /// When status or location last changed.
    pub last_update: DateTime<Utc>,
}

impl TrackedTourist {
    /// Creates a dashboard record for a freshly registered profile.
    #[must_use]
    pub fn from_profile(profile: &TouristProfile) -> Self {
        let now = Utc::now();
        Self {
            id: profile.tourist_id(),
            name: profile.name.trim().to_string(),
            destination: profile.destination.trim().to_string(),
            duration: profile.duration.trim().to_string(),
            status: TouristStatus::Safe,
            location: profile.destination.trim().to_string(),
            registered_at: now,
            last_update: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> TouristProfile {
        TouristProfile {
            name: "Emma Johnson".to_string(),
            email: "emma@example.com".to_string(),
            phone: "+39-555-0101".to_string(),
            passport: "CD987654".to_string(),
            destination: "Rome, Italy".to_string(),
            duration: "5 days".to_string(),
        }
    }

    #[test]
    fn complete_profile_validates() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn blank_field_is_reported_by_name() {
        let mut p = profile();
        p.destination = "  ".to_string();
        assert_eq!(p.validate(), Err(RegistryError::MissingField("destination")));

        let mut p = profile();
        p.name = String::new();
        assert_eq!(p.validate(), Err(RegistryError::MissingField("name")));
    }

    #[test]
    fn email_without_at_is_rejected() {
        let mut p = profile();
        p.email = "emma.example.com".to_string();
        assert!(matches!(p.validate(), Err(RegistryError::InvalidEmail(_))));
    }

    #[test]
    fn tourist_id_is_stable_and_normalized() {
        let a = TouristId::derive("cd987654", " Emma@Example.com ");
        let b = TouristId::derive("CD987654", "emma@example.com");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert_eq!(profile().tourist_id(), b);
    }

    #[test]
    fn tourist_id_differs_per_traveller() {
        let a = TouristId::derive("CD987654", "emma@example.com");
        let b = TouristId::derive("CD987655", "emma@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn tourist_id_does_not_leak_passport() {
        let id = profile().tourist_id();
        assert!(!id.as_str().to_uppercase().contains("CD987654"));
    }

    #[test]
    fn tourist_status_as_str_and_parse() {
        for status in [TouristStatus::Safe, TouristStatus::Warning, TouristStatus::Alert] {
            assert_eq!(TouristStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TouristStatus::parse("lost"), None);
    }

    #[test]
    fn tracked_tourist_starts_safe_at_destination() {
        let tourist = TrackedTourist::from_profile(&profile());
        assert_eq!(tourist.status, TouristStatus::Safe);
        assert_eq!(tourist.location, "Rome, Italy");
        assert_eq!(tourist.registered_at, tourist.last_update);
    }
}
