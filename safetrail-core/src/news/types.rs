//! Hazard and news item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How serious a hazard is. Ordered so `Critical` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Life-threatening, act now.
    Critical,
    /// Avoid the affected area.
    High,
    /// Expect disruption.
    Medium,
    /// Informational.
    Low,
}

impl Severity {
    /// Converts to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Hazard category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    /// Flooding.
    Flood,
    /// Earthquake.
    Earthquake,
    /// Storms and weather warnings.
    Weather,
    /// Public safety advisories.
    Safety,
    /// Transport disruption.
    Traffic,
}

impl HazardCategory {
    /// Converts to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Earthquake => "earthquake",
            Self::Weather => "weather",
            Self::Safety => "safety",
            Self::Traffic => "traffic",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flood" => Some(Self::Flood),
            "earthquake" => Some(Self::Earthquake),
            "weather" => Some(Self::Weather),
            "safety" => Some(Self::Safety),
            "traffic" => Some(Self::Traffic),
            _ => None,
        }
    }
}

/// A hazard or news bulletin for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Feed-assigned id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// How serious it is.
    pub severity: Severity,
    /// What kind of hazard.
    #[serde(rename = "type")]
    pub category: HazardCategory,
    /// Free-text affected area, e.g. "Central Paris".
    pub location: String,
    /// When the bulletin was published (UTC).
    pub published_at: DateTime<Utc>,
    /// Issuing authority.
    pub source: String,
    /// Link to the full bulletin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NewsItem {
    /// Returns whether this item concerns `destination`.
    ///
    /// Only the first comma-separated segment of the destination is used
    /// ("Paris, France" → "paris"), matched case-insensitively anywhere in
    /// the item's location. An empty segment matches everything.
    #[must_use]
    pub fn concerns(&self, destination: &str) -> bool {
        let place = destination
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        self.location.to_lowercase().contains(&place)
    }
}
