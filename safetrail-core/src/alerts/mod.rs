//! Safety alerts: SOS, geofence exits, and reported emergencies.
//!
//! Alerts are raised by tourists (SOS), by the tracker (geofence exit), or
//! on a tourist's behalf (emergency), and worked through
//! `Active → Acknowledged → Resolved` by agents. Dismissing an alert
//! removes it from the repository.

mod error;
mod repository;
mod types;

pub use error::{AlertError, Result};
pub use repository::AlertRepository;
pub use types::{
    active_alerts, Alert, AlertId, AlertKind, AlertPriority, AlertStatus, GEOFENCE_EXIT_MESSAGE,
};
