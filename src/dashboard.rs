//! Dashboard: fetch → store → render
//!
//! Owns the view state store and the two views. Nothing is fetched until the
//! owner calls [`Dashboard::mount`] (or one of the `load*` methods).
//!
//! ```no_run
//! use crypto_dashboard::{providers::RelayClient, Dashboard};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dashboard = Dashboard::new(Arc::new(RelayClient::local()?));
//! dashboard.mount().await;
//! println!("{}", dashboard.render());
//! # Ok(())
//! # }
//! ```

use crate::{
    error::MarketDataError,
    provider::MarketDataProvider,
    store::ViewStateStore,
    types::{MarketListQuery, PriceSeriesQuery},
    views::{ChartView, TableView},
};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;

const PAGE_HEADER: &str = "CryptoDashboard";

/// What happened to a successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store was replaced with this many items
    Applied(usize),
    /// The store was gone by the time the fetch resolved
    Discarded,
}

/// Crypto dashboard page: a market table and a price chart over one store
pub struct Dashboard {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<ViewStateStore>,
    table: TableView,
    chart: ChartView,
}

impl Dashboard {
    /// Dashboard with an empty store and the default chart asset
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_store(provider, Arc::new(ViewStateStore::new()), ChartView::default())
    }

    pub fn with_store(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<ViewStateStore>,
        chart: ChartView,
    ) -> Self {
        Self {
            provider,
            store,
            table: TableView::new(),
            chart,
        }
    }

    pub fn store(&self) -> &Arc<ViewStateStore> {
        &self.store
    }

    pub fn selected_asset(&self) -> &str {
        self.chart.asset_id()
    }

    /// Fetches the market list and replaces the store's list
    ///
    /// On failure the store keeps its previous list.
    pub async fn load(&self) -> Result<LoadOutcome, MarketDataError> {
        load_list(self.provider.clone(), Arc::downgrade(&self.store)).await
    }

    /// Fetches the series of the selected asset and replaces the store's series
    pub async fn load_chart(&self) -> Result<LoadOutcome, MarketDataError> {
        load_series(
            self.provider.clone(),
            Arc::downgrade(&self.store),
            self.chart.query(),
        )
        .await
    }

    /// Runs the table and chart fetches concurrently
    ///
    /// The two fetches are independent: either may fail without affecting
    /// the other.
    pub async fn mount(
        &self,
    ) -> (
        Result<LoadOutcome, MarketDataError>,
        Result<LoadOutcome, MarketDataError>,
    ) {
        futures::future::join(self.load(), self.load_chart()).await
    }

    /// Same as [`Dashboard::mount`], but on background tasks that only hold a
    /// weak reference to the store
    pub fn spawn_mount(
        &self,
    ) -> (
        JoinHandle<Result<LoadOutcome, MarketDataError>>,
        JoinHandle<Result<LoadOutcome, MarketDataError>>,
    ) {
        let list = tokio::spawn(load_list(
            self.provider.clone(),
            Arc::downgrade(&self.store),
        ));
        let series = tokio::spawn(load_series(
            self.provider.clone(),
            Arc::downgrade(&self.store),
            self.chart.query(),
        ));
        (list, series)
    }

    /// Changes the chart's asset, re-fetching its series if it changed
    ///
    /// # Returns
    /// `None` if the asset was already selected
    pub async fn select_asset(
        &mut self,
        asset_id: &str,
    ) -> Option<Result<LoadOutcome, MarketDataError>> {
        if !self.chart.select_asset(asset_id) {
            return None;
        }
        tracing::info!(asset = asset_id, "Selected chart asset");
        Some(self.load_chart().await)
    }

    /// Full page: header, table and chart
    pub fn render(&mut self) -> String {
        self.table.refresh(&self.store);
        self.chart.refresh(&self.store);

        format!(
            "{}\n\n{}\n\n{}",
            PAGE_HEADER,
            self.table.output(),
            self.chart.output()
        )
    }
}

async fn load_list(
    provider: Arc<dyn MarketDataProvider>,
    store: Weak<ViewStateStore>,
) -> Result<LoadOutcome, MarketDataError> {
    let entries = provider
        .fetch_market_list(&MarketListQuery::default())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load market list"))?;

    let Some(store) = store.upgrade() else {
        tracing::debug!("Store dropped while loading market list, discarding");
        return Ok(LoadOutcome::Discarded);
    };

    let count = entries.len();
    store.replace_list(entries);
    Ok(LoadOutcome::Applied(count))
}

async fn load_series(
    provider: Arc<dyn MarketDataProvider>,
    store: Weak<ViewStateStore>,
    query: PriceSeriesQuery,
) -> Result<LoadOutcome, MarketDataError> {
    let points = provider
        .fetch_price_series(&query)
        .await
        .inspect_err(|e| {
            tracing::warn!(asset = %query.asset_id, error = %e, "Failed to load price series")
        })?;

    let Some(store) = store.upgrade() else {
        tracing::debug!(asset = %query.asset_id, "Store dropped while loading price series, discarding");
        return Ok(LoadOutcome::Discarded);
    };

    let count = points.len();
    store.replace_series(points);
    Ok(LoadOutcome::Applied(count))
}
