//! Destination hazard and news bulletins.

mod error;
mod feed;
mod types;

pub use error::{NewsError, Result};
pub use feed::{
    fetch_for_destination, items_for_destination, spawn_refresher, HazardFeed, StaticHazardFeed,
    DEFAULT_REFRESH_INTERVAL,
};
pub use types::{HazardCategory, NewsItem, Severity};
