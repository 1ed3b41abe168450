//! In-memory view state of the dashboard

use crate::types::{MarketEntry, PricePoint};
use std::sync::Arc;
use tokio::sync::watch;

/// Latest market list and price series shown by the dashboard
///
/// Each value is an immutable `Arc<[T]>` snapshot held in a watch channel.
/// Replacing swaps the whole snapshot, so a reader holds either the old or
/// the new value and never a mix of both. Receivers returned by
/// `subscribe_*` are notified on every replace.
pub struct ViewStateStore {
    list: watch::Sender<Arc<[MarketEntry]>>,
    series: watch::Sender<Arc<[PricePoint]>>,
}

impl ViewStateStore {
    /// Creates an empty store
    pub fn new() -> Self {
        let (list, _) = watch::channel::<Arc<[MarketEntry]>>(Arc::from(Vec::new()));
        let (series, _) = watch::channel::<Arc<[PricePoint]>>(Arc::from(Vec::new()));
        Self { list, series }
    }

    /// Current market list snapshot (empty until the first successful fetch)
    pub fn current_list(&self) -> Arc<[MarketEntry]> {
        self.list.borrow().clone()
    }

    /// Current price series snapshot (empty until the first successful fetch)
    pub fn current_series(&self) -> Arc<[PricePoint]> {
        self.series.borrow().clone()
    }

    /// Swaps in a new market list
    pub fn replace_list(&self, entries: Vec<MarketEntry>) {
        let count = entries.len();
        self.list.send_replace(Arc::from(entries));
        tracing::debug!(count, "Replaced market list");
    }

    /// Swaps in a new price series
    pub fn replace_series(&self, points: Vec<PricePoint>) {
        let count = points.len();
        self.series.send_replace(Arc::from(points));
        tracing::debug!(count, "Replaced price series");
    }

    /// Receiver notified whenever the market list is replaced
    pub fn subscribe_list(&self) -> watch::Receiver<Arc<[MarketEntry]>> {
        self.list.subscribe()
    }

    /// Receiver notified whenever the price series is replaced
    pub fn subscribe_series(&self) -> watch::Receiver<Arc<[PricePoint]>> {
        self.series.subscribe()
    }
}

impl Default for ViewStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn generation(marker: usize, len: usize) -> Vec<MarketEntry> {
        (0..len)
            .map(|i| MarketEntry::new(format!("coin-{}", i), format!("gen-{}", marker), 1.0, 1.0))
            .collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = ViewStateStore::new();
        assert!(store.current_list().is_empty());
        assert!(store.current_series().is_empty());
    }

    #[test]
    fn test_replace_swaps_whole_value() {
        let store = ViewStateStore::new();
        store.replace_list(generation(1, 3));
        let before = store.current_list();

        store.replace_list(generation(2, 1));
        let after = store.current_list();

        // Old snapshot is unaffected by the replace.
        assert_eq!(before.len(), 3);
        assert!(before.iter().all(|e| e.name == "gen-1"));
        assert_eq!(after.len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_replace_series() {
        let store = ViewStateStore::new();
        store.replace_series(vec![PricePoint::new(1, 1.0), PricePoint::new(2, 2.0)]);
        assert_eq!(store.current_series().len(), 2);

        store.replace_series(Vec::new());
        assert!(store.current_series().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = ViewStateStore::new();
        let mut list_rx = store.subscribe_list();
        let mut series_rx = store.subscribe_series();

        store.replace_list(generation(1, 2));
        tokio::time::timeout(Duration::from_secs(1), list_rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list_rx.borrow_and_update().len(), 2);

        // Nothing happened to the series.
        assert!(!series_rx.has_changed().unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_never_see_partial_list() {
        let store = Arc::new(ViewStateStore::new());

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for marker in 0..500 {
                    store.replace_list(generation(marker, 1 + marker % 7));
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let snapshot = store.current_list();
                        if let Some(first) = snapshot.first() {
                            let marker: usize =
                                first.name.trim_start_matches("gen-").parse().unwrap();
                            assert_eq!(snapshot.len(), 1 + marker % 7);
                            assert!(snapshot.iter().all(|e| e.name == first.name));
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
