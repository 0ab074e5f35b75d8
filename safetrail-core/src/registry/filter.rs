//! Dashboard search and status counts.

use serde::{Deserialize, Serialize};

use super::types::{TouristStatus, TrackedTourist};

/// Search criteria for the tourist list.
///
/// The query matches name or destination, case-insensitively. An empty
/// filter matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouristFilter {
    /// Free-text search over name and destination.
    pub query: Option<String>,
    /// Only tourists with this status.
    pub status: Option<TouristStatus>,
}

impl TouristFilter {
    /// Creates a filter that matches everyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TouristStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns whether `tourist` passes this filter.
    #[must_use]
    pub fn matches(&self, tourist: &TrackedTourist) -> bool {
        let status_ok = self.status.map_or(true, |s| s == tourist.status);

        let query_ok = self.query.as_deref().map_or(true, |query| {
            let query = query.trim().to_lowercase();
            tourist.name.to_lowercase().contains(&query)
                || tourist.destination.to_lowercase().contains(&query)
        });

        status_ok && query_ok
    }

    /// Returns the matching tourists, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, tourists: &'a [TrackedTourist]) -> Vec<&'a TrackedTourist> {
        tourists.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Per-status tallies for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// All tourists.
    pub total: usize,
    /// Tourists marked safe.
    pub safe: usize,
    /// Tourists with a warning.
    pub warning: usize,
    /// Tourists in alert.
    pub alert: usize,
}

impl StatusCounts {
    /// Tallies a tourist list.
    #[must_use]
    pub fn tally<'a>(tourists: impl IntoIterator<Item = &'a TrackedTourist>) -> Self {
        tourists
            .into_iter()
            .fold(Self::default(), |mut counts, tourist| {
                counts.total += 1;
                match tourist.status {
                    TouristStatus::Safe => counts.safe += 1,
                    TouristStatus::Warning => counts.warning += 1,
                    TouristStatus::Alert => counts.alert += 1,
                }
                counts
            })
    }
}
