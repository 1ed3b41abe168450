//! Constants for the crypto dashboard
//!
//! Defaults for the upstream API, the relay server and the dashboard live here.
//! Environment overrides are read by the `config` module.

/// HTTP request timeout for upstream calls (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-dashboard/0.1.0";

/// Default quote currency
pub const DEFAULT_CURRENCY: &str = "usd";

/// Ordering requested from the upstream market list
pub const DEFAULT_ORDER: &str = "market_cap_desc";

/// Page size used by the relay route
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Page requested by the relay route
pub const DEFAULT_PAGE: u32 = 1;

/// Lookback window of the price chart (in days)
pub const DEFAULT_CHART_DAYS: u32 = 7;

/// Asset shown by the chart until another one is selected
pub const DEFAULT_CHART_ASSET: &str = "bitcoin";

/// Relay server listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Relay server bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Where the dashboard finds the relay server
pub const DEFAULT_RELAY_URL: &str = "http://localhost:5000";

/// Body sent by the relay for any upstream failure
pub const RELAY_FAILURE_BODY: &str = "Server Error";
