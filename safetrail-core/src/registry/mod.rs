//! Tourist registry.
//!
//! Registration profiles, stable tourist ids, QR payloads, and the
//! dashboard's search and tallies.
//!
//! # Privacy
//!
//! - The tourist id is a truncated SHA-256 of passport and email, never the
//!   passport number itself
//! - Dashboard records ([`TrackedTourist`]) carry no contact details; those
//!   only travel inside the QR payload the tourist holds

mod error;
mod filter;
mod qr;
mod repository;
mod types;

pub use error::{RegistryError, Result};
pub use filter::{StatusCounts, TouristFilter};
pub use qr::{download_file_name, QrPayload};
pub use repository::TouristRepository;
pub use types::{TouristId, TouristProfile, TouristStatus, TrackedTourist};
