//! Storage seam for alerts.

use super::types::{Alert, AlertId, AlertStatus};
use crate::storage::StorageResult;

/// Persistence for [`Alert`]s.
pub trait AlertRepository {
    /// Stores a new alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails or the id exists.
    fn insert_alert(&self, alert: &Alert) -> StorageResult<()>;

    /// Looks up an alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get_alert(&self, id: &AlertId) -> StorageResult<Option<Alert>>;

    /// Lists all alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn list_alerts(&self) -> StorageResult<Vec<Alert>>;

    /// Overwrites the status of an alert.
    ///
    /// Lifecycle rules are enforced by [`Alert::transition`], not here.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`](crate::storage::StorageError) if
    /// the alert does not exist.
    fn update_alert_status(&self, id: &AlertId, status: AlertStatus) -> StorageResult<()>;

    /// Removes an alert. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn delete_alert(&self, id: &AlertId) -> StorageResult<bool>;
}
