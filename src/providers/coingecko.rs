//! CoinGecko market data provider implementation

use crate::{
    constants::{COINGECKO_API_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::MarketDataError,
    provider::MarketDataProvider,
    providers::{endpoint_url, read_json},
    types::{MarketEntry, MarketListQuery, PricePoint, PriceSeriesQuery},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// CoinGecko API response for market chart queries
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    /// `[timestamp_millis, price]` pairs
    prices: Vec<(f64, f64)>,
}

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a provider for the public CoinGecko API
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider for a CoinGecko-compatible API at `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, MarketDataError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider with a custom transport timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns the chart response into ascending samples
    fn parse_chart(response: MarketChartResponse) -> Vec<PricePoint> {
        let mut points: Vec<PricePoint> = response
            .prices
            .into_iter()
            .map(|(timestamp, price)| PricePoint::new(timestamp as i64, price))
            .collect();

        // Stable, so equal timestamps keep their upstream order.
        points.sort_by_key(|p| p.timestamp);
        points
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_market_list(
        &self,
        query: &MarketListQuery,
    ) -> Result<Vec<MarketEntry>, MarketDataError> {
        query.validate()?;

        let url = endpoint_url(&self.base_url, &["coins", "markets"])?;
        tracing::debug!(url = %url, page = query.page, per_page = query.per_page, "Fetching market list from CoinGecko");

        let response = self.client.get(url).query(&query.to_params()).send().await?;
        let mut entries: Vec<MarketEntry> = read_json(response, "CoinGecko markets").await?;

        if entries.len() > query.per_page as usize {
            tracing::warn!(
                received = entries.len(),
                per_page = query.per_page,
                "CoinGecko returned more entries than requested, truncating"
            );
            entries.truncate(query.per_page as usize);
        }

        tracing::debug!(count = entries.len(), "Fetched market list from CoinGecko");

        Ok(entries)
    }

    async fn fetch_price_series(
        &self,
        query: &PriceSeriesQuery,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        query.validate()?;

        let url = endpoint_url(&self.base_url, &["coins", &query.asset_id, "market_chart"])?;
        tracing::debug!(url = %url, days = query.days, "Fetching price series from CoinGecko");

        let response = self.client.get(url).query(&query.to_params()).send().await?;
        let chart: MarketChartResponse = read_json(response, "CoinGecko market chart").await?;
        let points = Self::parse_chart(chart);

        tracing::debug!(
            asset = %query.asset_id,
            count = points.len(),
            "Fetched price series from CoinGecko"
        );

        Ok(points)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
