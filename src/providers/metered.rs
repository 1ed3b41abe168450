//! Provider wrapper recording call metrics

use crate::{
    error::MarketDataError,
    metrics::{MetricsCollector, ProviderMetrics},
    provider::MarketDataProvider,
    types::{MarketEntry, MarketListQuery, PricePoint, PriceSeriesQuery},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Times every call of the inner provider
///
/// Calls rejected before reaching the network (`InvalidRequest`) are not
/// recorded.
pub struct MeteredProvider {
    inner: Arc<dyn MarketDataProvider>,
    metrics: MetricsCollector,
}

impl MeteredProvider {
    pub fn new(inner: Arc<dyn MarketDataProvider>) -> Self {
        let metrics = MetricsCollector::new(inner.provider_name());
        Self { inner, metrics }
    }

    pub async fn get_metrics(&self) -> ProviderMetrics {
        self.metrics.get_metrics().await
    }

    async fn record<T>(&self, start: Instant, result: &Result<T, MarketDataError>) {
        match result {
            Err(MarketDataError::InvalidRequest(_)) => {}
            Ok(_) => self.metrics.record_request(start.elapsed(), true).await,
            Err(e) => {
                tracing::warn!(
                    provider = self.inner.provider_name(),
                    kind = e.kind(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Upstream call failed"
                );
                self.metrics.record_request(start.elapsed(), false).await
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for MeteredProvider {
    async fn fetch_market_list(
        &self,
        query: &MarketListQuery,
    ) -> Result<Vec<MarketEntry>, MarketDataError> {
        let start = Instant::now();
        let result = self.inner.fetch_market_list(query).await;
        self.record(start, &result).await;
        result
    }

    async fn fetch_price_series(
        &self,
        query: &PriceSeriesQuery,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let start = Instant::now();
        let result = self.inner.fetch_price_series(query).await;
        self.record(start, &result).await;
        result
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
