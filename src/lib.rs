//! # Crypto Dashboard
//!
//! Cryptocurrency market dashboard built on the CoinGecko API, in two parts:
//!
//! - a **relay server** exposing `GET /api/cryptos` (top 10 coins by market
//!   cap, in USD) so that dashboards never talk to the upstream directly
//! - a **dashboard** that fetches the market list and a 7 day price series,
//!   keeps them in a [`ViewStateStore`] and renders a table and a line chart
//!
//! ## Usage
//!
//! ```no_run
//! use crypto_dashboard::{CoinGeckoProvider, MarketDataProvider, MarketListQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = CoinGeckoProvider::new()?;
//! let coins = provider.fetch_market_list(&MarketListQuery::default()).await?;
//! for coin in coins {
//!     println!("{}: ${}", coin.name, coin.current_price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! CoinGecko API
//!     ↓
//! CoinGeckoProvider ── relay server (/api/cryptos) ── RelayClient
//!     ↓                                                  ↓
//!     └──────────────── Dashboard::mount() ──────────────┘
//!                            ↓
//!                      ViewStateStore
//!                            ↓
//!                  TableView / ChartView
//! ```
//!
//! ## Error Handling
//!
//! Providers report [`MarketDataError`]: `UpstreamUnavailable`,
//! `UpstreamError` or `DecodeError`. The relay server turns all of them into
//! `500 Server Error`; the dashboard leaves its store untouched.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod relay;
pub mod store;
pub mod types;
pub mod user;
pub mod views;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::{Dashboard, LoadOutcome};
pub use error::{ConfigError, MarketDataError};
pub use metrics::ProviderMetrics;
pub use provider::MarketDataProvider;
pub use providers::{CoinGeckoProvider, MeteredProvider, RelayClient};
pub use store::ViewStateStore;
pub use types::{ChartData, MarketEntry, MarketListQuery, PricePoint, PriceSeriesQuery};
pub use user::User;
