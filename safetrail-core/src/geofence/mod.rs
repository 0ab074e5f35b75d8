//! Geofence evaluation.
//!
//! Decides whether a coordinate falls inside a fixed-radius circle and
//! detects the inside to outside transition that triggers a one-time
//! notification.
//!
//! # Semantics
//!
//! - Distance is the haversine great-circle distance on a sphere of radius
//!   6,371 km
//! - The radius boundary is inclusive
//! - Only exits are alarmed; re-entry and staying outside are silent
//! - Coordinates are validated on construction, so evaluation itself
//!   cannot fail
//!
//! # Example Usage
//!
//! ```
//! use safetrail_core::geofence::{evaluate, Coordinate, Geofence, MembershipState};
//!
//! let center = Coordinate::new(40.7128, -74.0060).unwrap();
//! let fence = Geofence::new(center, 1_000.0).unwrap();
//!
//! let mut state = MembershipState::Inside;
//! let fix = Coordinate::new(40.7228, -74.0060).unwrap();
//!
//! let eval = evaluate(fix, &fence, state.is_inside());
//! state = MembershipState::from_inside(eval.inside);
//!
//! assert!(eval.crossed_out);
//! assert_eq!(state, MembershipState::Outside);
//! ```

mod distance;
mod error;
mod types;

pub use distance::{distance_meters, evaluate, is_inside, EARTH_RADIUS_METERS};
pub use error::{GeofenceError, Result};
pub use types::{Coordinate, Evaluation, Geofence, MembershipState};
