//! Crate-level error type for [`SafetyCore`](crate::SafetyCore).

use thiserror::Error;

use crate::alerts::{AlertError, AlertId};
use crate::config::ConfigError;
use crate::news::NewsError;
use crate::registry::{RegistryError, TouristId};
use crate::storage::StorageError;
use crate::tracking::TrackingError;

/// Error type for [`SafetyCore`](crate::SafetyCore) operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Registration data was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An alert could not be raised or moved.
    #[error(transparent)]
    Alert(#[from] AlertError),

    /// The local store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Tracking could not start.
    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// Settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The hazard feed failed.
    #[error(transparent)]
    News(#[from] NewsError),

    /// No tourist with this id.
    #[error("Tourist not found: {0}")]
    TouristNotFound(TouristId),

    /// No alert with this id.
    #[error("Alert not found: {0}")]
    AlertNotFound(AlertId),

    /// The data directory could not be prepared.
    #[error("Failed to create data directory: {0}")]
    Io(String),
}

/// Result type alias for [`SafetyCore`](crate::SafetyCore) operations.
pub type Result<T> = std::result::Result<T, CoreError>;
