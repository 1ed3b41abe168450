//! Client of a relay server
//!
//! Lets the dashboard read market data through `/api/cryptos` instead of
//! calling the upstream directly.

use crate::{
    constants::{DEFAULT_RELAY_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::MarketDataError,
    provider::MarketDataProvider,
    providers::{endpoint_url, read_json},
    types::{MarketEntry, MarketListQuery, PricePoint, PriceSeriesQuery},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Relay server client
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Relay server on the default local port
    pub fn local() -> Result<Self, MarketDataError> {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait]
impl MarketDataProvider for RelayClient {
    /// The relay route has fixed paging and currency; only `per_page`
    /// applies here, as a truncation of what the relay returns.
    async fn fetch_market_list(
        &self,
        query: &MarketListQuery,
    ) -> Result<Vec<MarketEntry>, MarketDataError> {
        query.validate()?;

        let defaults = MarketListQuery::default();
        if query.vs_currency != defaults.vs_currency
            || query.order != defaults.order
            || query.page != defaults.page
        {
            tracing::debug!(?query, "Relay serves fixed defaults, query parameters ignored");
        }

        let url = endpoint_url(&self.base_url, &["api", "cryptos"])?;
        tracing::debug!(url = %url, "Fetching market list from relay");

        let response = self.client.get(url).send().await?;
        let mut entries: Vec<MarketEntry> = read_json(response, "relay").await?;
        entries.truncate(query.per_page as usize);

        Ok(entries)
    }

    async fn fetch_price_series(
        &self,
        query: &PriceSeriesQuery,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        query.validate()?;

        let url = endpoint_url(&self.base_url, &["api", "cryptos", &query.asset_id, "chart"])?;
        tracing::debug!(url = %url, days = query.days, "Fetching price series from relay");

        let response = self.client.get(url).query(&query.to_params()).send().await?;
        let mut points: Vec<PricePoint> = read_json(response, "relay").await?;
        points.sort_by_key(|p| p.timestamp);

        Ok(points)
    }

    fn provider_name(&self) -> &'static str {
        "relay"
    }
}
