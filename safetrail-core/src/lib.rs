//! SafeTrail Core Library
//!
//! Tourist safety monitoring: a geofence evaluator that watches a tourist's
//! position and raises an alert once per exit from the designated area,
//! plus the registry, alert triage, QR scanning, hazard feed and local
//! storage around it.
//!
//! Start from [`SafetyCore`] for the combined API, or use
//! [`geofence`] and [`tracking`] on their own.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod alerts;
mod api;
pub mod config;
mod error;
pub mod geofence;
pub mod news;
pub mod registry;
pub mod scanner;
pub mod storage;
pub mod tracking;

pub use api::{SafetyCore, DATABASE_FILE};
pub use config::SafetySettings;
pub use error::{CoreError, Result};
