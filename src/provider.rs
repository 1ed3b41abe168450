//! Provider abstraction for fetching market data

use crate::{
    error::MarketDataError,
    types::{MarketEntry, MarketListQuery, PricePoint, PriceSeriesQuery},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implemented by the CoinGecko client, by the client of a relay server and
/// by the metered wrapper. Implementations never retry; a failed call is
/// reported to the caller as is.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of the market list
    ///
    /// # Arguments
    /// * `query` - Currency, ordering and paging of the request
    ///
    /// # Returns
    /// At most `query.per_page` entries, in upstream order
    async fn fetch_market_list(
        &self,
        query: &MarketListQuery,
    ) -> Result<Vec<MarketEntry>, MarketDataError>;

    /// Fetches the price history of one asset
    ///
    /// # Returns
    /// Samples ordered by timestamp ascending
    async fn fetch_price_series(
        &self,
        query: &PriceSeriesQuery,
    ) -> Result<Vec<PricePoint>, MarketDataError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Failure a mock call should produce
    #[derive(Debug, Clone)]
    pub enum MockFailure {
        Unavailable,
        Status(u16, String),
        Decode(String),
    }

    impl MockFailure {
        fn to_error(&self) -> MarketDataError {
            match self {
                MockFailure::Unavailable => {
                    // Only reqwest can build a reqwest::Error; an unparsable URL does.
                    let err = reqwest::Client::new()
                        .get("http://[::1")
                        .build()
                        .unwrap_err();
                    MarketDataError::UpstreamUnavailable(err)
                }
                MockFailure::Status(status, body) => MarketDataError::upstream(*status, body),
                MockFailure::Decode(msg) => MarketDataError::decode(msg),
            }
        }
    }

    /// Mock provider for testing
    pub struct MockProvider {
        list: Arc<Mutex<Result<Vec<MarketEntry>, MockFailure>>>,
        series: Arc<Mutex<Result<Vec<PricePoint>, MockFailure>>>,
        delay: Arc<Mutex<Option<Duration>>>,
        list_calls: Arc<Mutex<Vec<MarketListQuery>>>,
        series_calls: Arc<Mutex<Vec<PriceSeriesQuery>>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                list: Arc::new(Mutex::new(Ok(Vec::new()))),
                series: Arc::new(Mutex::new(Ok(Vec::new()))),
                delay: Arc::new(Mutex::new(None)),
                list_calls: Arc::new(Mutex::new(Vec::new())),
                series_calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn set_list(&self, entries: Vec<MarketEntry>) {
            *self.list.lock().unwrap() = Ok(entries);
        }

        pub fn set_list_error(&self, failure: MockFailure) {
            *self.list.lock().unwrap() = Err(failure);
        }

        pub fn set_series(&self, points: Vec<PricePoint>) {
            *self.series.lock().unwrap() = Ok(points);
        }

        pub fn set_series_error(&self, failure: MockFailure) {
            *self.series.lock().unwrap() = Err(failure);
        }

        /// Makes every call sleep before answering
        pub fn set_delay(&self, delay: Duration) {
            *self.delay.lock().unwrap() = Some(delay);
        }

        pub fn list_calls(&self) -> Vec<MarketListQuery> {
            self.list_calls.lock().unwrap().clone()
        }

        pub fn series_calls(&self) -> Vec<PriceSeriesQuery> {
            self.series_calls.lock().unwrap().clone()
        }

        async fn maybe_sleep(&self) {
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn fetch_market_list(
            &self,
            query: &MarketListQuery,
        ) -> Result<Vec<MarketEntry>, MarketDataError> {
            self.list_calls.lock().unwrap().push(query.clone());
            self.maybe_sleep().await;
            let result = self.list.lock().unwrap().clone();
            result.map_err(|failure| failure.to_error())
        }

        async fn fetch_price_series(
            &self,
            query: &PriceSeriesQuery,
        ) -> Result<Vec<PricePoint>, MarketDataError> {
            self.series_calls.lock().unwrap().push(query.clone());
            self.maybe_sleep().await;
            let result = self.series.lock().unwrap().clone();
            result.map_err(|failure| failure.to_error())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
