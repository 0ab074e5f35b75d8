//! Storage seam for tourist records.

use super::types::{TouristId, TouristStatus, TrackedTourist};
use crate::storage::StorageResult;

/// Persistence for [`TrackedTourist`] records.
///
/// The dashboard reads tourists only through this trait, so callers decide
/// where records live (SQLite on device, an in-memory fixture in tests).
pub trait TouristRepository {
    /// Inserts a tourist, or refreshes the profile fields of an existing
    /// one (name, destination, duration, last update).
    ///
    /// Status and location of an existing record are left untouched; they
    /// only change through [`update_tourist_status`](Self::update_tourist_status).
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn save_tourist(&self, tourist: &TrackedTourist) -> StorageResult<()>;

    /// Looks up a tourist by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get_tourist(&self, id: &TouristId) -> StorageResult<Option<TrackedTourist>>;

    /// Lists all tourists, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn list_tourists(&self) -> StorageResult<Vec<TrackedTourist>>;

    /// Updates status and, when given, the location label.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`](crate::storage::StorageError) if
    /// no tourist has this id.
    fn update_tourist_status(
        &self,
        id: &TouristId,
        status: TouristStatus,
        location: Option<&str>,
    ) -> StorageResult<()>;
}
