//! Location tracking against a geofence.
//!
//! Connects an external [`LocationProvider`] to the geofence evaluator.
//!
//! # Architecture
//!
//! ```text
//! LocationProvider (GPS / simulator)
//!     │  deliver(fix | error)
//!     ▼
//! LocationSink ──▶ Session (Mutex) ──▶ geofence::evaluate
//!                                      │
//!                                      ▼
//!                          TrackingEvent channel (tokio mpsc)
//! ```
//!
//! Evaluation is synchronous on the provider's callback. Each fix
//! supersedes the previous one; nothing is queued besides the outgoing
//! events.

mod error;
mod provider;
mod simulated;
mod tracker;

pub use error::{LocationError, Result, TrackingError};
pub use provider::{LocationFix, LocationProvider, WatchId, WatchOptions};
pub use simulated::SimulatedLocationProvider;
pub use tracker::{GeofenceTracker, LocationSink, TrackingEvent};
