//! `SQLite` storage for tourists and alerts.
//!
//! Everything lives in a single local database file. Timestamps are stored
//! as RFC 3339 text with nanosecond precision so they sort lexically and
//! read back unchanged.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::error::{StorageError, StorageResult};
use crate::alerts::{Alert, AlertId, AlertKind, AlertPriority, AlertRepository, AlertStatus};
use crate::registry::{TouristId, TouristRepository, TouristStatus, TrackedTourist};

/// `SQLite`-backed [`TouristRepository`] and [`AlertRepository`].
pub struct SafetyStorage {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SafetyStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyStorage").finish_non_exhaustive()
    }
}

impl SafetyStorage {
    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or initialized.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Creates an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn initialize_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tourists (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                destination TEXT NOT NULL,
                duration TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'safe',
                location TEXT NOT NULL DEFAULT '',
                registered_at TEXT NOT NULL,
                last_update TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS alerts (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                tourist_name TEXT NOT NULL,
                message TEXT NOT NULL,
                location TEXT NOT NULL,
                priority TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_alerts_created_at ON alerts(created_at);
            ",
        )?;

        Ok(())
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_time(column: &str, raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("Invalid {column} '{raw}': {e}")))
}

// ==================== Tourists ====================

const TOURIST_COLUMNS: &str =
    "id, name, destination, duration, status, location, registered_at, last_update";

struct TouristRow {
    id: String,
    name: String,
    destination: String,
    duration: String,
    status: String,
    location: String,
    registered_at: String,
    last_update: String,
}

impl TouristRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            destination: row.get(2)?,
            duration: row.get(3)?,
            status: row.get(4)?,
            location: row.get(5)?,
            registered_at: row.get(6)?,
            last_update: row.get(7)?,
        })
    }

    fn into_tourist(self) -> StorageResult<TrackedTourist> {
        let status = TouristStatus::parse(&self.status).ok_or_else(|| {
            StorageError::InvalidData(format!("Invalid tourist status: {}", self.status))
        })?;
        Ok(TrackedTourist {
            id: TouristId::from_hex(self.id),
            name: self.name,
            destination: self.destination,
            duration: self.duration,
            status,
            location: self.location,
            registered_at: parse_time("registered_at", &self.registered_at)?,
            last_update: parse_time("last_update", &self.last_update)?,
        })
    }
}

impl TouristRepository for SafetyStorage {
    fn save_tourist(&self, tourist: &TrackedTourist) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute(
            r"
            INSERT INTO tourists (id, name, destination, duration, status, location, registered_at, last_update)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                destination = excluded.destination,
                duration = excluded.duration,
                last_update = excluded.last_update
            ",
            params![
                tourist.id.as_str(),
                &tourist.name,
                &tourist.destination,
                &tourist.duration,
                tourist.status.as_str(),
                &tourist.location,
                format_time(&tourist.registered_at),
                format_time(&tourist.last_update),
            ],
        )?;

        Ok(())
    }

    fn get_tourist(&self, id: &TouristId) -> StorageResult<Option<TrackedTourist>> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {TOURIST_COLUMNS} FROM tourists WHERE id = ?1"),
            params![id.as_str()],
            TouristRow::read,
        )
        .optional()?
        .map(TouristRow::into_tourist)
        .transpose()
    }

    fn list_tourists(&self) -> StorageResult<Vec<TrackedTourist>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {TOURIST_COLUMNS} FROM tourists ORDER BY last_update DESC, rowid DESC"
        ))?;
        let rows = stmt
            .query_map([], TouristRow::read)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(TouristRow::into_tourist).collect()
    }

    fn update_tourist_status(
        &self,
        id: &TouristId,
        status: TouristStatus,
        location: Option<&str>,
    ) -> StorageResult<()> {
        let conn = self.lock()?;

        let changed = conn.execute(
            r"
            UPDATE tourists
            SET status = ?2, location = COALESCE(?3, location), last_update = ?4
            WHERE id = ?1
            ",
            params![id.as_str(), status.as_str(), location, format_time(&Utc::now())],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(format!("tourist {id}")));
        }
        Ok(())
    }
}

// ==================== Alerts ====================

const ALERT_COLUMNS: &str = "id, kind, tourist_name, message, location, priority, status, created_at";

struct AlertRow {
    id: String,
    kind: String,
    tourist_name: String,
    message: String,
    location: String,
    priority: String,
    status: String,
    created_at: String,
}

impl AlertRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            tourist_name: row.get(2)?,
            message: row.get(3)?,
            location: row.get(4)?,
            priority: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_alert(self) -> StorageResult<Alert> {
        let kind = AlertKind::parse(&self.kind)
            .ok_or_else(|| StorageError::InvalidData(format!("Invalid alert kind: {}", self.kind)))?;
        let priority = AlertPriority::parse(&self.priority).ok_or_else(|| {
            StorageError::InvalidData(format!("Invalid alert priority: {}", self.priority))
        })?;
        let status = AlertStatus::parse(&self.status).ok_or_else(|| {
            StorageError::InvalidData(format!("Invalid alert status: {}", self.status))
        })?;
        Ok(Alert {
            id: AlertId::from_hex(self.id),
            kind,
            tourist_name: self.tourist_name,
            message: self.message,
            location: self.location,
            created_at: parse_time("created_at", &self.created_at)?,
            priority,
            status,
        })
    }
}

impl AlertRepository for SafetyStorage {
    fn insert_alert(&self, alert: &Alert) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute(
            r"
            INSERT INTO alerts (id, kind, tourist_name, message, location, priority, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                alert.id.as_str(),
                alert.kind.as_str(),
                &alert.tourist_name,
                &alert.message,
                &alert.location,
                alert.priority.as_str(),
                alert.status.as_str(),
                format_time(&alert.created_at),
            ],
        )?;

        Ok(())
    }

    fn get_alert(&self, id: &AlertId) -> StorageResult<Option<Alert>> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1"),
            params![id.as_str()],
            AlertRow::read,
        )
        .optional()?
        .map(AlertRow::into_alert)
        .transpose()
    }

    fn list_alerts(&self) -> StorageResult<Vec<Alert>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
            .query_map([], AlertRow::read)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(AlertRow::into_alert).collect()
    }

    fn update_alert_status(&self, id: &AlertId, status: AlertStatus) -> StorageResult<()> {
        let conn = self.lock()?;

        let changed = conn.execute(
            "UPDATE alerts SET status = ?2 WHERE id = ?1",
            params![id.as_str(), status.as_str()],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(format!("alert {id}")));
        }
        Ok(())
    }

    fn delete_alert(&self, id: &AlertId) -> StorageResult<bool> {
        let conn = self.lock()?;

        let deleted = conn.execute("DELETE FROM alerts WHERE id = ?1", params![id.as_str()])?;
        Ok(deleted > 0)
    }
}
