//! High-level API tying registry, alerts, tracking and storage together.
//!
//! [`SafetyCore`] is what a host application holds: it registers tourists,
//! turns tracker crossings and SOS presses into alerts, and serves the
//! agent dashboard views.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

use crate::alerts::{active_alerts, Alert, AlertId, AlertRepository, AlertStatus};
use crate::config::SafetySettings;
use crate::error::{CoreError, Result};
use crate::geofence::Coordinate;
use crate::news::{fetch_for_destination, spawn_refresher, HazardFeed, NewsItem};
use crate::registry::{
    QrPayload, StatusCounts, TouristFilter, TouristId, TouristProfile, TouristRepository,
    TouristStatus, TrackedTourist,
};
use crate::scanner::{MockScanner, ScanOutcome};
use crate::storage::SafetyStorage;
use crate::tracking::{GeofenceTracker, LocationProvider, TrackingEvent};

/// File name of the local database inside the data directory.
pub const DATABASE_FILE: &str = "safetrail.db";

/// Entry point for tourist safety operations.
///
/// Generic over the repository so tests and hosts can supply their own
/// store; [`SafetyCore::open`] uses [`SafetyStorage`].
///
/// # Example
///
/// ```
/// use safetrail_core::registry::TouristProfile;
/// use safetrail_core::SafetyCore;
///
/// let core = SafetyCore::in_memory().unwrap();
/// let profile = TouristProfile {
///     name: "Lisa Chen".into(),
///     email: "lisa@example.com".into(),
///     phone: "+81-555-0104".into(),
///     passport: "GH789012".into(),
///     destination: "Tokyo, Japan".into(),
///     duration: "5 days".into(),
/// };
///
/// let (tourist, _payload) = core.register_tourist(&profile).unwrap();
/// let alert = core.raise_sos(&tourist.id, "Lost in Shibuya").unwrap();
/// assert_eq!(core.active_alerts().unwrap(), vec![alert]);
/// ```
#[derive(Debug)]
pub struct SafetyCore<R> {
    repository: R,
    settings: SafetySettings,
}

impl SafetyCore<SafetyStorage> {
    /// Opens the core with a database in `data_dir`.
    ///
    /// Creates the directory and database if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open(data_dir: &Path, settings: SafetySettings) -> Result<Self> {
        settings.validate()?;
        std::fs::create_dir_all(data_dir).map_err(|e| CoreError::Io(e.to_string()))?;
        let storage = SafetyStorage::new(&data_dir.join(DATABASE_FILE))?;
        Ok(Self::new(storage, settings))
    }

    /// Creates a core over an in-memory database with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(SafetyStorage::in_memory()?, SafetySettings::default()))
    }
}

impl<R: TouristRepository + AlertRepository> SafetyCore<R> {
    /// Creates a core over `repository`.
    #[must_use]
    pub const fn new(repository: R, settings: SafetySettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &SafetySettings {
        &self.settings
    }

    /// Underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    // ==================== Registration ====================

    /// Registers a tourist and returns their stored record and QR payload.
    ///
    /// Registering the same passport and email again refreshes the profile
    /// fields of the existing record; its status and location are kept, so
    /// an open incident is not cleared by re-registration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Registry`] if the profile is incomplete, or
    /// [`CoreError::Storage`] if saving fails.
    pub fn register_tourist(&self, profile: &TouristProfile) -> Result<(TrackedTourist, QrPayload)> {
        profile.validate()?;
        let payload = QrPayload::encode(profile)?;
        self.repository
            .save_tourist(&TrackedTourist::from_profile(profile))?;
        let tourist = self.tourist(&profile.tourist_id())?;
        info!("Registered tourist {} for {}", tourist.id, tourist.destination);
        Ok((tourist, payload))
    }

    /// Finds the registered record for a scanned QR code.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the lookup fails.
    pub fn lookup_scan(&self, outcome: &ScanOutcome) -> Result<Option<TrackedTourist>> {
        let id = outcome.profile.tourist_id();
        debug!("Looking up scanned tourist {id} ({})", outcome.method.as_str());
        Ok(self.repository.get_tourist(&id)?)
    }

    /// A demo scanner using the configured scan delay.
    #[must_use]
    pub fn mock_scanner(&self) -> MockScanner {
        MockScanner::new().with_delay(self.settings.scan_delay())
    }

    /// Looks up a tourist.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] if no tourist has this id.
    pub fn tourist(&self, id: &TouristId) -> Result<TrackedTourist> {
        self.repository
            .get_tourist(id)?
            .ok_or_else(|| CoreError::TouristNotFound(id.clone()))
    }

    /// All tourists, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if listing fails.
    pub fn tourists(&self) -> Result<Vec<TrackedTourist>> {
        Ok(self.repository.list_tourists()?)
    }

    /// Tourists matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if listing fails.
    pub fn search_tourists(&self, filter: &TouristFilter) -> Result<Vec<TrackedTourist>> {
        Ok(self
            .repository
            .list_tourists()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect())
    }

    /// Tourist totals per status.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if listing fails.
    pub fn status_counts(&self) -> Result<StatusCounts> {
        Ok(StatusCounts::tally(&self.repository.list_tourists()?))
    }

    /// Sets a tourist's status, e.g. back to safe after an incident.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] if no tourist has this id.
    pub fn set_tourist_status(&self, id: &TouristId, status: TouristStatus) -> Result<()> {
        self.update_tourist(id, status, None)
    }

    fn update_tourist(
        &self,
        id: &TouristId,
        status: TouristStatus,
        location: Option<&str>,
    ) -> Result<()> {
        match self.repository.update_tourist_status(id, status, location) {
            Err(crate::storage::StorageError::NotFound(_)) => {
                Err(CoreError::TouristNotFound(id.clone()))
            }
            other => other.map_err(CoreError::from),
        }
    }

    // ==================== Alerts ====================

    /// Raises an SOS for a tourist at their last known location.
    ///
    /// The tourist is marked [`TouristStatus::Alert`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] for an unknown tourist, or
    /// [`CoreError::Alert`] if the message is blank.
    pub fn raise_sos(&self, tourist_id: &TouristId, message: &str) -> Result<Alert> {
        let tourist = self.tourist(tourist_id)?;
        let alert = Alert::sos(&tourist.name, message, &tourist.location)?;
        self.raise_for(&tourist, &alert, None)?;
        info!("SOS raised for tourist {tourist_id}: alert {}", alert.id);
        Ok(alert)
    }

    /// Reports an emergency on a tourist's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] for an unknown tourist, or
    /// [`CoreError::Alert`] if the message is blank.
    pub fn report_emergency(&self, tourist_id: &TouristId, message: &str) -> Result<Alert> {
        let tourist = self.tourist(tourist_id)?;
        let alert = Alert::emergency(&tourist.name, message, &tourist.location)?;
        self.raise_for(&tourist, &alert, None)?;
        info!("Emergency reported for tourist {tourist_id}: alert {}", alert.id);
        Ok(alert)
    }

    /// Records a geofence exit.
    ///
    /// Marks the tourist [`TouristStatus::Alert`] at the exit position and
    /// raises a geofence alert.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] for an unknown tourist, or
    /// [`CoreError::Storage`] if saving fails.
    pub fn record_crossing(
        &self,
        tourist_id: &TouristId,
        coordinate: Coordinate,
        distance_meters: f64,
    ) -> Result<Alert> {
        let tourist = self.tourist(tourist_id)?;
        let alert = Alert::geofence_exit(
            &tourist.name,
            coordinate,
            distance_meters,
            self.settings.geohash_precision,
        );
        let position = coordinate.geohash(self.settings.geohash_precision);
        self.raise_for(&tourist, &alert, Some(&position))?;
        info!(
            "Tourist {tourist_id} left the designated area ({distance_meters:.0} m): alert {}",
            alert.id
        );
        Ok(alert)
    }

    /// Marks `tourist` as [`TouristStatus::Alert`] and stores `alert`.
    ///
    /// If the alert cannot be stored the tourist's previous status and
    /// location are put back, so a failed raise leaves no partial state.
    fn raise_for(
        &self,
        tourist: &TrackedTourist,
        alert: &Alert,
        location: Option<&str>,
    ) -> Result<()> {
        self.update_tourist(&tourist.id, TouristStatus::Alert, location)?;
        if let Err(e) = self.repository.insert_alert(alert) {
            if let Err(restore) = self.repository.update_tourist_status(
                &tourist.id,
                tourist.status,
                Some(&tourist.location),
            ) {
                warn!("Failed to restore tourist {} after alert error: {restore}", tourist.id);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies a tracker event for `tourist_id`.
    ///
    /// Crossings become alerts; every other event is ignored.
    ///
    /// # Errors
    ///
    /// Propagates [`record_crossing`](Self::record_crossing) errors.
    pub fn handle_tracking_event(
        &self,
        tourist_id: &TouristId,
        event: &TrackingEvent,
    ) -> Result<Option<Alert>> {
        match event {
            TrackingEvent::CrossedOut {
                coordinate,
                distance_meters,
            } => self
                .record_crossing(tourist_id, *coordinate, *distance_meters)
                .map(Some),
            _ => Ok(None),
        }
    }

    /// Marks an alert acknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlertNotFound`] or [`CoreError::Alert`] if the
    /// alert is not active.
    pub fn acknowledge_alert(&self, id: &AlertId) -> Result<Alert> {
        self.transition_alert(id, AlertStatus::Acknowledged)
    }

    /// Marks an alert resolved.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlertNotFound`] or [`CoreError::Alert`] if the
    /// alert is already resolved.
    pub fn resolve_alert(&self, id: &AlertId) -> Result<Alert> {
        self.transition_alert(id, AlertStatus::Resolved)
    }

    fn transition_alert(&self, id: &AlertId, next: AlertStatus) -> Result<Alert> {
        let mut alert = self
            .repository
            .get_alert(id)?
            .ok_or_else(|| CoreError::AlertNotFound(id.clone()))?;
        alert.transition(next)?;
        self.repository.update_alert_status(id, alert.status)?;
        debug!("Alert {id} is now {}", alert.status.as_str());
        Ok(alert)
    }

    /// Removes an alert from the dashboard. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if deletion fails.
    pub fn dismiss_alert(&self, id: &AlertId) -> Result<bool> {
        let removed = self.repository.delete_alert(id)?;
        debug!("Dismissed alert {id}: {removed}");
        Ok(removed)
    }

    /// All alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if listing fails.
    pub fn alerts(&self) -> Result<Vec<Alert>> {
        Ok(self.repository.list_alerts()?)
    }

    /// Newest active alerts, capped at the compact panel limit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if listing fails.
    pub fn active_alerts(&self) -> Result<Vec<Alert>> {
        let alerts = self.repository.list_alerts()?;
        Ok(active_alerts(&alerts, self.settings.compact_alert_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    // ==================== Tracking & hazards ====================

    /// Starts a tracker on the configured geofence.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the configured fence is invalid, or
    /// [`CoreError::Tracking`] if the provider refuses the watch.
    pub fn start_tracking<P: LocationProvider>(
        &self,
        provider: Arc<P>,
    ) -> Result<(GeofenceTracker<P>, UnboundedReceiver<TrackingEvent>)> {
        let fence = self.settings.geofence()?;
        let (mut tracker, events) = GeofenceTracker::with_options(provider, self.settings.watch);
        tracker.start(fence)?;
        Ok((tracker, events))
    }

    /// Current hazard bulletins for a tourist's destination.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`] or [`CoreError::News`].
    pub fn hazards_for<F: HazardFeed + ?Sized>(
        &self,
        feed: &F,
        tourist_id: &TouristId,
    ) -> Result<Vec<NewsItem>> {
        let tourist = self.tourist(tourist_id)?;
        Ok(fetch_for_destination(feed, &tourist.destination)?)
    }

    /// Keeps a tourist's hazard bulletins fresh in the background.
    ///
    /// Refreshes every [`SafetySettings::news_refresh_interval`], starting
    /// immediately. Drop the receiver to stop the task. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TouristNotFound`], or [`CoreError::News`] if the
    /// configured interval is zero.
    pub fn spawn_hazard_refresher<F: HazardFeed + 'static>(
        &self,
        feed: Arc<F>,
        tourist_id: &TouristId,
    ) -> Result<(JoinHandle<()>, mpsc::Receiver<Vec<NewsItem>>)> {
        let tourist = self.tourist(tourist_id)?;
        let period = self.settings.news_refresh_interval();
        debug!(
            "Refreshing hazards for {} every {}s",
            tourist.destination,
            period.as_secs()
        );
        Ok(spawn_refresher(feed, tourist.destination, period)?)
    }
}
