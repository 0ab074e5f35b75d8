//! In-process location provider for demos and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use super::error::LocationError;
use super::provider::{LocationFix, LocationProvider, WatchId, WatchOptions};
use super::tracker::LocationSink;

#[derive(Debug, Default)]
struct SimulatorState {
    next_id: u64,
    watches: HashMap<WatchId, LocationSink>,
    denial: Option<LocationError>,
    last_options: Option<WatchOptions>,
}

/// A [`LocationProvider`] driven by explicit calls instead of hardware.
///
/// Fixes pushed with [`push`](Self::push) are delivered synchronously to
/// every live watch, in registration order.
///
/// # Example
///
/// ```
/// use safetrail_core::tracking::{LocationError, SimulatedLocationProvider};
///
/// let provider = SimulatedLocationProvider::new();
/// provider.deny(LocationError::PermissionDenied);
/// assert_eq!(provider.active_watches(), 0);
/// ```
#[derive(Debug, Default)]
pub struct SimulatedLocationProvider {
    state: Mutex<SimulatorState>,
}

impl SimulatedLocationProvider {
    /// Creates a provider with no watches that grants permission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimulatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers a fix to every live watch.
    pub fn push(&self, fix: LocationFix) {
        for sink in self.sinks() {
            sink.deliver(Ok(fix.clone()));
        }
    }

    /// Delivers a fix at the given position, timestamped now.
    pub fn push_position(&self, latitude: f64, longitude: f64) {
        self.push(LocationFix::new(latitude, longitude));
    }

    /// Delivers an error to every live watch.
    pub fn fail(&self, error: LocationError) {
        for sink in self.sinks() {
            sink.deliver(Err(error.clone()));
        }
    }

    /// Makes every future `watch` call fail with `error`.
    pub fn deny(&self, error: LocationError) {
        self.state().denial = Some(error);
    }

    /// Lifts a previous [`deny`](Self::deny).
    pub fn allow(&self) {
        self.state().denial = None;
    }

    /// Number of registered watches.
    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.state().watches.len()
    }

    /// Options passed with the most recent successful `watch` call.
    #[must_use]
    pub fn last_options(&self) -> Option<WatchOptions> {
        self.state().last_options
    }

    /// Snapshot of the registered sinks, ordered by watch id.
    ///
    /// Deliveries happen outside the provider lock so a sink may stop its
    /// tracker without deadlocking.
    #[must_use]
    pub fn sinks(&self) -> Vec<LocationSink> {
        let state = self.state();
        let mut entries: Vec<_> = state.watches.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, sink)| sink.clone()).collect()
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn watch(&self, options: &WatchOptions, sink: LocationSink) -> Result<WatchId, LocationError> {
        let mut state = self.state();
        if let Some(denial) = &state.denial {
            return Err(denial.clone());
        }

        state.next_id += 1;
        let id = WatchId(state.next_id);
        state.watches.insert(id, sink);
        state.last_options = Some(*options);
        debug!("Simulated watch {} registered", id.0);
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) {
        if self.state().watches.remove(&id).is_some() {
            debug!("Simulated watch {} cleared", id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geofence::{Coordinate, Geofence, MembershipState};
    use crate::tracking::GeofenceTracker;

    fn fence() -> Geofence {
        Geofence::new(Coordinate::new(48.8584, 2.2945).unwrap(), 500.0).unwrap()
    }

    #[test]
    fn clear_unknown_watch_is_ignored() {
        let provider = SimulatedLocationProvider::new();
        provider.clear_watch(WatchId(42));
        assert_eq!(provider.active_watches(), 0);
    }

    #[test]
    fn push_reaches_every_tracker() {
        let provider = Arc::new(SimulatedLocationProvider::new());
        let (mut first, _rx1) = GeofenceTracker::new(Arc::clone(&provider));
        let (mut second, _rx2) = GeofenceTracker::new(Arc::clone(&provider));
        first.start(fence()).unwrap();
        second.start(fence()).unwrap();

        provider.push_position(48.8584, 2.2945);

        assert_eq!(provider.active_watches(), 2);
        assert_eq!(first.membership(), MembershipState::Inside);
        assert_eq!(second.membership(), MembershipState::Inside);
    }

    #[test]
    fn allow_lifts_denial() {
        let provider = Arc::new(SimulatedLocationProvider::new());
        provider.deny(LocationError::Unsupported);
        let (mut tracker, _rx) = GeofenceTracker::new(Arc::clone(&provider));
        assert!(tracker.start(fence()).is_err());

        provider.allow();
        assert!(tracker.start(fence()).is_ok());
        assert_eq!(provider.active_watches(), 1);
    }

    #[test]
    fn watch_ids_are_unique() {
        let provider = Arc::new(SimulatedLocationProvider::new());
        let (mut tracker, _rx) = GeofenceTracker::new(Arc::clone(&provider));

        tracker.start(fence()).unwrap();
        tracker.stop();
        tracker.start(fence()).unwrap();

        assert_eq!(provider.active_watches(), 1);
        assert_eq!(provider.state().next_id, 2);
    }
}
