//! Alert types and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AlertError, Result};
use crate::geofence::Coordinate;

/// Message attached to automatic geofence alerts.
pub const GEOFENCE_EXIT_MESSAGE: &str = "Tourist moved outside designated safe zone";

/// Opaque alert identifier (128 random bits, hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(hex::encode(bytes))
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

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Tourist pressed the SOS button.
    Sos,
    /// Tourist left the designated area.
    Geofence,
    /// Emergency reported on the tourist's behalf (medical, police).
    Emergency,
}

impl AlertKind {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sos => "sos",
            Self::Geofence => "geofence",
            Self::Emergency => "emergency",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sos" => Some(Self::Sos),
            "geofence" => Some(Self::Geofence),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

/// Triage priority. Ordered so `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    /// Needs immediate response.
    High,
    /// Needs attention soon.
    Medium,
    /// Informational.
    Low,
}

impl AlertPriority {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Where an alert is in its handling.
///
/// ```text
/// Active ──acknowledge──▶ Acknowledged
///   │                          │
///   └────────resolve───────────┴──▶ Resolved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Nobody has responded yet.
    Active,
    /// An agent is on it.
    Acknowledged,
    /// Handled; terminal.
    Resolved,
}

impl AlertStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "acknowledged" => Some(Self::Acknowledged),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Returns whether moving to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Acknowledged | Self::Resolved)
                | (Self::Acknowledged, Self::Resolved)
        )
    }
}

/// An alert on the agent dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique id.
    pub id: AlertId,
    /// What raised it.
    pub kind: AlertKind,
    /// Tourist the alert is about.
    pub tourist_name: String,
    /// Description of the situation.
    pub message: String,
    /// Human-readable location.
    pub location: String,
    /// When it was raised (UTC).
    pub created_at: DateTime<Utc>,
    /// Triage priority.
    pub priority: AlertPriority,
    /// Handling status.
    pub status: AlertStatus,
}

impl Alert {
    fn raise(
        kind: AlertKind,
        priority: AlertPriority,
        tourist_name: &str,
        message: &str,
        location: &str,
    ) -> Self {
        Self {
            id: AlertId::generate(),
            kind,
            tourist_name: tourist_name.trim().to_string(),
            message: message.trim().to_string(),
            location: location.trim().to_string(),
            created_at: Utc::now(),
            priority,
            status: AlertStatus::Active,
        }
    }

    /// Creates a high-priority SOS alert.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::EmptyMessage`] if `message` is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use safetrail_core::alerts::{Alert, AlertPriority, AlertStatus};
    ///
    /// let alert = Alert::sos("Michael Brown", "Lost near the old town", "Barcelona").unwrap();
    /// assert_eq!(alert.priority, AlertPriority::High);
    /// assert_eq!(alert.status, AlertStatus::Active);
    ///
    /// assert!(Alert::sos("Michael Brown", "  ", "Barcelona").is_err());
    /// ```
    pub fn sos(tourist_name: &str, message: &str, location: &str) -> Result<Self> {
        if message.trim().is_empty() {
            return Err(AlertError::EmptyMessage);
        }
        Ok(Self::raise(
            AlertKind::Sos,
            AlertPriority::High,
            tourist_name,
            message,
            location,
        ))
    }

    /// Creates a high-priority emergency alert reported for a tourist.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::EmptyMessage`] if `message` is blank.
    pub fn emergency(tourist_name: &str, message: &str, location: &str) -> Result<Self> {
        if message.trim().is_empty() {
            return Err(AlertError::EmptyMessage);
        }
        Ok(Self::raise(
            AlertKind::Emergency,
            AlertPriority::High,
            tourist_name,
            message,
            location,
        ))
    }

    /// Creates a medium-priority alert for a geofence exit.
    ///
    /// The location label carries the exit position as a geohash of
    /// `geohash_len` characters plus the distance from the fence center.
    #[must_use]
    pub fn geofence_exit(
        tourist_name: &str,
        coordinate: Coordinate,
        distance_meters: f64,
        geohash_len: usize,
    ) -> Self {
        let location = format!(
            "{} ({distance_meters:.0} m from zone center)",
            coordinate.geohash(geohash_len)
        );
        Self::raise(
            AlertKind::Geofence,
            AlertPriority::Medium,
            tourist_name,
            GEOFENCE_EXIT_MESSAGE,
            &location,
        )
    }

    /// Marks the alert acknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::InvalidTransition`] unless the alert is active.
    pub fn acknowledge(&mut self) -> Result<()> {
        self.transition(AlertStatus::Acknowledged)
    }

    /// Marks the alert resolved.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::InvalidTransition`] if already resolved.
    pub fn resolve(&mut self) -> Result<()> {
        self.transition(AlertStatus::Resolved)
    }

    /// Moves to `next` if the lifecycle allows it.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::InvalidTransition`] for disallowed moves.
    pub fn transition(&mut self, next: AlertStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(AlertError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Returns whether nobody has responded yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Active alerts for the compact dashboard panel, at most `limit`.
///
/// Input order is kept (repositories list newest first).
#[must_use]
pub fn active_alerts(alerts: &[Alert], limit: usize) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.is_active()).take(limit).collect()
}
