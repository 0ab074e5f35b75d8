//! Geofence tracking session.
//!
//! [`GeofenceTracker`] subscribes to a [`LocationProvider`], evaluates
//! every delivered fix against the active [`Geofence`], and reports what
//! happened as [`TrackingEvent`]s on an unbounded channel.
//!
//! # Session Rules
//!
//! - `start` is idempotent: a running tracker never registers a second watch
//! - `stop` is idempotent and synchronous: once it returns, no further fix
//!   is evaluated, even if the provider delivers late
//! - Each session starts [`MembershipState::Unresolved`]; provider errors
//!   and rejected coordinates never change the state
//! - State is frozen (still readable) after `stop`

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, trace, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::error::{LocationError, Result};
use super::provider::{LocationFix, LocationProvider, WatchId, WatchOptions};
use crate::geofence::{evaluate, Coordinate, Evaluation, Geofence, GeofenceError, MembershipState};

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// A session began with this fence.
    Started {
        /// The fence for this session.
        fence: Geofence,
    },

    /// A valid fix was evaluated.
    Evaluated {
        /// The evaluated position.
        coordinate: Coordinate,
        /// Evaluation result.
        evaluation: Evaluation,
        /// Membership after this fix.
        state: MembershipState,
    },

    /// The subject just left the fence. Emitted once per exit.
    CrossedOut {
        /// First position observed outside.
        coordinate: Coordinate,
        /// Distance from the fence center.
        distance_meters: f64,
    },

    /// A fix was out of range and was not evaluated.
    CoordinateRejected(GeofenceError),

    /// The provider reported an error; membership is unchanged.
    LocationUnavailable(LocationError),

    /// The session ended.
    Stopped,
}

/// Mutable session state shared between the tracker and its sinks.
#[derive(Debug)]
struct Session {
    generation: u64,
    active: bool,
    fence: Option<Geofence>,
    state: MembershipState,
    last_coordinate: Option<Coordinate>,
    events: UnboundedSender<TrackingEvent>,
}

impl Session {
    fn emit(&self, event: TrackingEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.events.send(event);
    }

    fn handle(&mut self, update: std::result::Result<LocationFix, LocationError>) {
        let fix = match update {
            Ok(fix) => fix,
            Err(err) => {
                warn!(
                    "Location unavailable, membership left at {}: {err}",
                    self.state.as_str()
                );
                self.emit(TrackingEvent::LocationUnavailable(err));
                return;
            }
        };

        let Some(fence) = self.fence else {
            return;
        };

        let coordinate = match fix.coordinate() {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!("Rejected location fix: {err}");
                self.emit(TrackingEvent::CoordinateRejected(err));
                return;
            }
        };

        let evaluation = evaluate(coordinate, &fence, self.state.is_inside());
        self.state = MembershipState::from_inside(evaluation.inside);
        self.last_coordinate = Some(coordinate);

        debug!(
            "Evaluated fix {coordinate}: {:.1} m from center, {}",
            evaluation.distance_meters,
            self.state.as_str()
        );

        self.emit(TrackingEvent::Evaluated {
            coordinate,
            evaluation,
            state: self.state,
        });

        if evaluation.crossed_out {
            info!(
                "Geofence exit at {coordinate} ({:.0} m from center, radius {:.0} m)",
                evaluation.distance_meters,
                fence.radius_meters()
            );
            self.emit(TrackingEvent::CrossedOut {
                coordinate,
                distance_meters: evaluation.distance_meters,
            });
        }
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    // Session state stays consistent across a panic in `emit`, so a
    // poisoned lock is safe to reuse.
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Delivery handle given to a [`LocationProvider`].
///
/// Each sink belongs to one tracking session. Deliveries to a sink whose
/// session has been stopped (or replaced by a newer one) are dropped.
#[derive(Debug, Clone)]
pub struct LocationSink {
    session: Arc<Mutex<Session>>,
    generation: u64,
}

impl LocationSink {
    /// Delivers a fix or provider error to the tracking session.
    ///
    /// Evaluation happens synchronously on the caller's thread.
    pub fn deliver(&self, update: std::result::Result<LocationFix, LocationError>) {
        let mut session = lock(&self.session);
        if !session.active || session.generation != self.generation {
            trace!("Dropping location update for stale session");
            return;
        }
        session.handle(update);
    }

    /// Returns whether deliveries to this sink are still evaluated.
    #[must_use]
    pub fn is_live(&self) -> bool {
        let session = lock(&self.session);
        session.active && session.generation == self.generation
    }
}

/// Tracks one subject against a geofence while a watch is active.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use safetrail_core::geofence::{Coordinate, Geofence, MembershipState};
/// use safetrail_core::tracking::{GeofenceTracker, LocationFix, SimulatedLocationProvider};
///
/// let provider = Arc::new(SimulatedLocationProvider::new());
/// let (mut tracker, _events) = GeofenceTracker::new(Arc::clone(&provider));
///
/// let center = Coordinate::new(40.7128, -74.0060).unwrap();
/// tracker.start(Geofence::new(center, 1_000.0).unwrap()).unwrap();
///
/// provider.push(LocationFix::new(40.7128, -74.0060));
/// assert_eq!(tracker.membership(), MembershipState::Inside);
///
/// tracker.stop();
/// assert_eq!(provider.active_watches(), 0);
/// ```
pub struct GeofenceTracker<P: LocationProvider> {
    provider: Arc<P>,
    options: WatchOptions,
    session: Arc<Mutex<Session>>,
    watch: Option<WatchId>,
}

impl<P: LocationProvider> GeofenceTracker<P> {
    /// Creates a stopped tracker with default [`WatchOptions`].
    ///
    /// Returns the tracker and the receiving end of its event channel.
    #[must_use]
    pub fn new(provider: Arc<P>) -> (Self, UnboundedReceiver<TrackingEvent>) {
        Self::with_options(provider, WatchOptions::default())
    }

    /// Creates a stopped tracker with custom watch options.
    #[must_use]
    pub fn with_options(
        provider: Arc<P>,
        options: WatchOptions,
    ) -> (Self, UnboundedReceiver<TrackingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session {
            generation: 0,
            active: false,
            fence: None,
            state: MembershipState::Unresolved,
            last_coordinate: None,
            events: tx,
        };

        let tracker = Self {
            provider,
            options,
            session: Arc::new(Mutex::new(session)),
            watch: None,
        };
        (tracker, rx)
    }

    /// Starts tracking against `fence`.
    ///
    /// Does nothing if already tracking; the running session keeps its
    /// original fence.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::LocationUnavailable`](super::TrackingError)
    /// if the provider refuses the watch. The tracker stays stopped.
    pub fn start(&mut self, fence: Geofence) -> Result<()> {
        if self.watch.is_some() {
            debug!("Tracking already active, ignoring start");
            return Ok(());
        }

        let generation = {
            let mut session = lock(&self.session);
            session.generation += 1;
            session.active = true;
            session.fence = Some(fence);
            session.state = MembershipState::Unresolved;
            session.last_coordinate = None;
            session.emit(TrackingEvent::Started { fence });
            session.generation
        };

        let sink = LocationSink {
            session: Arc::clone(&self.session),
            generation,
        };

        match self.provider.watch(&self.options, sink) {
            Ok(id) => {
                debug!(
                    "Tracking started (watch {}, radius {:.0} m)",
                    id.0,
                    fence.radius_meters()
                );
                self.watch = Some(id);
                Ok(())
            }
            Err(err) => {
                warn!("Location provider refused watch: {err}");
                let mut session = lock(&self.session);
                session.active = false;
                session.fence = None;
                session.emit(TrackingEvent::LocationUnavailable(err.clone()));
                session.emit(TrackingEvent::Stopped);
                Err(err.into())
            }
        }
    }

    /// Stops tracking. Does nothing if not tracking.
    ///
    /// After this returns no fix is evaluated until the next `start`.
    pub fn stop(&mut self) {
        let Some(id) = self.watch.take() else {
            return;
        };

        {
            let mut session = lock(&self.session);
            session.active = false;
            session.fence = None;
            session.emit(TrackingEvent::Stopped);
        }

        self.provider.clear_watch(id);
        debug!("Tracking stopped (watch {})", id.0);
    }

    /// Returns whether a watch is active.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.watch.is_some()
    }

    /// Latest membership state (frozen while stopped).
    #[must_use]
    pub fn membership(&self) -> MembershipState {
        lock(&self.session).state
    }

    /// Last successfully evaluated coordinate in the current or last session.
    #[must_use]
    pub fn last_coordinate(&self) -> Option<Coordinate> {
        lock(&self.session).last_coordinate
    }

    /// Fence of the running session, if any.
    #[must_use]
    pub fn geofence(&self) -> Option<Geofence> {
        lock(&self.session).fence
    }

    /// Watch options used for new sessions.
    #[must_use]
    pub const fn options(&self) -> &WatchOptions {
        &self.options
    }
}

impl<P: LocationProvider> Drop for GeofenceTracker<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<P: LocationProvider> std::fmt::Debug for GeofenceTracker<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeofenceTracker")
            .field("options", &self.options)
            .field("watch", &self.watch)
            .field("membership", &self.membership())
            .finish_non_exhaustive()
    }
}
