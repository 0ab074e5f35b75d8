//! Local persistence.
//!
//! [`SafetyStorage`] keeps tourists and alerts in a single `SQLite` file on
//! the device. Nothing here talks to a network.

mod database;
mod error;

pub use database::SafetyStorage;
pub use error::{StorageError, StorageResult};
