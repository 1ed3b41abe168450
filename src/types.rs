//! Types for the crypto dashboard

use crate::{
    constants::{
        DEFAULT_CHART_DAYS, DEFAULT_CURRENCY, DEFAULT_ORDER, DEFAULT_PAGE, DEFAULT_PER_PAGE,
    },
    error::MarketDataError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One asset's current market snapshot
///
/// Field names follow the upstream JSON so that a list can be relayed
/// to clients without reshaping. Fields not modelled here are kept in
/// `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    /// Upstream identifier (e.g. "bitcoin")
    pub id: String,

    /// Display name (e.g. "Bitcoin")
    pub name: String,

    /// Price in the requested currency
    #[serde(deserialize_with = "null_as_zero", serialize_with = "whole_as_integer")]
    pub current_price: f64,

    /// Market capitalization in the requested currency
    #[serde(deserialize_with = "null_as_zero", serialize_with = "whole_as_integer")]
    pub market_cap: f64,

    /// Remaining upstream fields (`symbol`, `image`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, market_cap: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_price: price,
            market_cap,
            extra: Map::new(),
        }
    }
}

/// The upstream sends `null` prices for coins without recent trades.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Writes `50000.0` back as `50000`, the way the upstream sent it.
fn whole_as_integer<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// One timestamped price sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Epoch milliseconds
    pub timestamp: i64,

    /// Price in the requested currency
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Sample time as a UTC datetime, if the timestamp is representable
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Date label used on chart axes (`YYYY-MM-DD`, UTC)
    pub fn date_label(&self) -> String {
        self.datetime()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// Parameters of a market list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketListQuery {
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub sparkline: bool,
}

impl Default for MarketListQuery {
    fn default() -> Self {
        Self {
            vs_currency: DEFAULT_CURRENCY.to_string(),
            order: DEFAULT_ORDER.to_string(),
            per_page: DEFAULT_PER_PAGE,
            page: DEFAULT_PAGE,
            sparkline: false,
        }
    }
}

impl MarketListQuery {
    /// Creates a query ordered by market cap, without sparkline data
    pub fn new(vs_currency: &str, per_page: u32, page: u32) -> Self {
        Self {
            vs_currency: vs_currency.to_string(),
            per_page,
            page,
            ..Self::default()
        }
    }

    /// Rejects zero page sizes, zero pages and empty currencies
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.vs_currency.trim().is_empty() {
            return Err(MarketDataError::invalid("currency must not be empty"));
        }
        if self.per_page == 0 {
            return Err(MarketDataError::invalid("per_page must be positive"));
        }
        if self.page == 0 {
            return Err(MarketDataError::invalid("page must be positive"));
        }
        Ok(())
    }

    /// Query string pairs in the order the upstream documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", self.sparkline.to_string()),
        ]
    }
}

/// Parameters of a price history request for one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeriesQuery {
    pub asset_id: String,
    pub vs_currency: String,
    pub days: u32,
}

impl PriceSeriesQuery {
    pub fn new(asset_id: &str, vs_currency: &str, days: u32) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            vs_currency: vs_currency.to_string(),
            days,
        }
    }

    /// Default currency and lookback window for `asset_id`
    pub fn for_asset(asset_id: &str) -> Self {
        Self::new(asset_id, DEFAULT_CURRENCY, DEFAULT_CHART_DAYS)
    }

    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.asset_id.trim().is_empty() {
            return Err(MarketDataError::invalid("asset id must not be empty"));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(MarketDataError::invalid("currency must not be empty"));
        }
        if self.days == 0 {
            return Err(MarketDataError::invalid("days must be positive"));
        }
        Ok(())
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("days", self.days.to_string()),
        ]
    }
}

/// Line chart input derived from a price series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Chart heading
    pub title: String,
    /// Legend of the single dataset
    pub dataset_label: String,
    /// Formatted date of each sample
    pub labels: Vec<String>,
    /// Price of each sample
    pub values: Vec<f64>,
}

impl ChartData {
    /// Builds labels and values point by point, keeping the series order
    pub fn from_series(asset_id: &str, vs_currency: &str, series: &[PricePoint]) -> Self {
        let (labels, values) = series
            .iter()
            .map(|point| (point.date_label(), point.price))
            .unzip();

        Self {
            title: format!("Chart of {}", asset_id),
            dataset_label: format!("Price ({})", vs_currency.to_uppercase()),
            labels,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_entry_from_upstream_json() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": 50000,
            "market_cap": 1000000000,
            "market_cap_rank": 1
        }"#;

        let entry: MarketEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "bitcoin");
        assert_eq!(entry.name, "Bitcoin");
        assert_eq!(entry.current_price, 50000.0);
        assert_eq!(entry.market_cap, 1e9);
        assert_eq!(entry.extra["symbol"], "btc");
        assert_eq!(entry.extra["market_cap_rank"], 1);
    }

    #[test]
    fn test_market_entry_writes_back_upstream_json() {
        let upstream = serde_json::json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 50000,
            "market_cap": 1000000000u64,
            "price_change_percentage_24h": -1.25
        });

        let entry: MarketEntry = serde_json::from_value(upstream.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), upstream);
    }

    #[test]
    fn test_fractional_prices_stay_floats() {
        let entry = MarketEntry::new("shiba-inu", "Shiba Inu", 0.0000125, 7.5e9);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["current_price"], 0.0000125);
        assert_eq!(value["market_cap"], 7500000000u64);
    }

    #[test]
    fn test_market_entry_null_prices() {
        let json = r#"{"id":"dust","name":"Dust","current_price":null,"market_cap":null}"#;
        let entry: MarketEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.current_price, 0.0);
        assert_eq!(entry.market_cap, 0.0);
    }

    #[test]
    fn test_market_entry_missing_field_is_error() {
        let json = r#"{"id":"bitcoin","current_price":1,"market_cap":2}"#;
        assert!(serde_json::from_str::<MarketEntry>(json).is_err());
    }

    #[test]
    fn test_default_query_matches_relay_defaults() {
        let query = MarketListQuery::default();
        assert_eq!(
            query.to_params(),
            vec![
                ("vs_currency", "usd".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", "10".to_string()),
                ("page", "1".to_string()),
                ("sparkline", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_validation() {
        assert!(MarketListQuery::new("usd", 0, 1).validate().is_err());
        assert!(MarketListQuery::new("usd", 10, 0).validate().is_err());
        assert!(MarketListQuery::new("", 10, 1).validate().is_err());
        assert!(MarketListQuery::new("eur", 5, 2).validate().is_ok());

        assert!(PriceSeriesQuery::new("", "usd", 7).validate().is_err());
        assert!(PriceSeriesQuery::new("bitcoin", "usd", 0).validate().is_err());
        assert!(PriceSeriesQuery::for_asset("bitcoin").validate().is_ok());
    }

    #[test]
    fn test_date_label() {
        // 2024-01-01T00:00:00Z
        let point = PricePoint::new(1_704_067_200_000, 42000.0);
        assert_eq!(point.date_label(), "2024-01-01");
    }

    #[test]
    fn test_chart_data_from_series() {
        let series = [
            PricePoint::new(1_704_067_200_000, 1.0),
            PricePoint::new(1_704_153_600_000, 2.5),
        ];
        let chart = ChartData::from_series("bitcoin", "usd", &series);

        assert_eq!(chart.title, "Chart of bitcoin");
        assert_eq!(chart.dataset_label, "Price (USD)");
        assert_eq!(chart.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(chart.values, vec![1.0, 2.5]);
    }
}
