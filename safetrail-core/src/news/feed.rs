//! Hazard feed sources and destination filtering.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::{NewsError, Result};
use super::types::NewsItem;

/// Default refresh period for hazard feeds.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// A source of hazard bulletins.
pub trait HazardFeed: Send + Sync {
    /// Fetches the current bulletins.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] if the source is unavailable or malformed.
    fn fetch(&self) -> Result<Vec<NewsItem>>;
}

/// A feed that serves a fixed list of items.
#[derive(Debug, Clone, Default)]
pub struct StaticHazardFeed {
    items: Vec<NewsItem>,
}

impl StaticHazardFeed {
    /// Creates a feed serving `items`.
    #[must_use]
    pub const fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    /// Loads items from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::InvalidData`] if the JSON does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        let items =
            serde_json::from_str(json).map_err(|e| NewsError::InvalidData(e.to_string()))?;
        Ok(Self { items })
    }
}

impl HazardFeed for StaticHazardFeed {
    fn fetch(&self) -> Result<Vec<NewsItem>> {
        Ok(self.items.clone())
    }
}

/// Keeps items concerning `destination`, most severe first, then newest.
#[must_use]
pub fn items_for_destination(items: Vec<NewsItem>, destination: &str) -> Vec<NewsItem> {
    let mut relevant: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| item.concerns(destination))
        .collect();
    relevant.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    relevant
}

/// Fetches from `feed` and filters for `destination`.
///
/// # Errors
///
/// Propagates the feed's error.
pub fn fetch_for_destination<F: HazardFeed + ?Sized>(
    feed: &F,
    destination: &str,
) -> Result<Vec<NewsItem>> {
    Ok(items_for_destination(feed.fetch()?, destination))
}

/// Spawns a task that refreshes `destination`'s bulletins every `period`.
///
/// The first refresh happens immediately. Failed fetches are logged and
/// skipped. The task ends once the returned receiver is dropped.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`NewsError::ZeroRefreshPeriod`] if `period` is zero.
pub fn spawn_refresher<F>(
    feed: Arc<F>,
    destination: String,
    period: Duration,
) -> Result<(JoinHandle<()>, mpsc::Receiver<Vec<NewsItem>>)>
where
    F: HazardFeed + 'static,
{
    if period.is_zero() {
        return Err(NewsError::ZeroRefreshPeriod);
    }

    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match fetch_for_destination(feed.as_ref(), &destination) {
                Ok(items) => {
                    debug!("Hazard feed refreshed: {} items for {destination}", items.len());
                    if tx.send(items).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Hazard feed refresh failed: {e}"),
            }
        }
    });
    Ok((handle, rx))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::news::{HazardCategory, Severity};

    fn item(id: &str, severity: Severity, location: &str, minute: u32) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("Bulletin {id}"),
            description: String::new(),
            severity,
            category: HazardCategory::Safety,
            location: location.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            source: "Test".to_string(),
            url: None,
        }
    }

    #[test]
    fn filters_and_orders_by_severity_then_newest() {
        let items = vec![
            item("low", Severity::Low, "Paris Metropolitan Area", 50),
            item("high-old", Severity::High, "Central Paris", 10),
            item("elsewhere", Severity::Critical, "Tokyo", 59),
            item("high-new", Severity::High, "Paris, France", 40),
            item("critical", Severity::Critical, "Paris Metro", 0),
        ];

        let ids: Vec<String> = items_for_destination(items, "Paris, France")
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["critical", "high-new", "high-old", "low"]);
    }

    #[test]
    fn static_feed_from_json() {
        let json = r#"[{
            "id": "1",
            "title": "Metro Line Disruption",
            "description": "Line 1 suspended",
            "severity": "medium",
            "type": "traffic",
            "location": "Paris Metro",
            "published_at": "2024-05-01T12:00:00Z",
            "source": "RATP"
        }]"#;
        let feed = StaticHazardFeed::from_json(json).unwrap();
        let items = feed.fetch().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, HazardCategory::Traffic);
        assert_eq!(items[0].url, None);
    }

    #[test]
    fn static_feed_rejects_bad_json() {
        assert!(matches!(
            StaticHazardFeed::from_json("{not json"),
            Err(NewsError::InvalidData(_))
        ));
    }

    struct CountingFeed {
        calls: AtomicUsize,
    }

    impl HazardFeed for CountingFeed {
        fn fetch(&self) -> Result<Vec<NewsItem>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 1 {
                return Err(NewsError::Unavailable("offline".to_string()));
            }
            Ok(vec![item("x", Severity::Low, "Rome", 0)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresher_delivers_periodically_and_skips_failures() {
        let feed = Arc::new(CountingFeed {
            calls: AtomicUsize::new(0),
        });
        let (handle, mut rx) =
            spawn_refresher(Arc::clone(&feed), "Rome".to_string(), Duration::from_secs(60))
                .unwrap();

        assert_eq!(rx.recv().await.unwrap().len(), 1);
        // Second fetch fails and is skipped; third delivers.
        assert_eq!(rx.recv().await.unwrap().len(), 1);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 3);

        drop(rx);
        tokio::time::advance(Duration::from_secs(60)).await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn refresher_rejects_zero_period() {
        let feed = Arc::new(StaticHazardFeed::default());

        let result = spawn_refresher(feed, "Rome".to_string(), Duration::ZERO);

        assert!(matches!(result, Err(NewsError::ZeroRefreshPeriod)));
    }
}
