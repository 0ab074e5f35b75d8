//! Shared fixtures for integration tests.

#![allow(dead_code)]

use safetrail_core::registry::TouristProfile;
use safetrail_core::tracking::TrackingEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Designated area center used throughout the tests (Manhattan).
pub const CENTER: (f64, f64) = (40.7128, -74.0060);

/// A complete registration profile.
pub fn profile(name: &str, passport: &str, destination: &str) -> TouristProfile {
    TouristProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "+1-555-0100".to_string(),
        passport: passport.to_string(),
        destination: destination.to_string(),
        duration: "7 days".to_string(),
    }
}

/// Takes every event currently queued on the channel.
pub fn drain(events: &mut UnboundedReceiver<TrackingEvent>) -> Vec<TrackingEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Number of exit notifications among `events`.
pub fn crossings(events: &[TrackingEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TrackingEvent::CrossedOut { .. }))
        .count()
}
