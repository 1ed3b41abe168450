//! Process configuration
//!
//! Read once at start-up from the environment (and a `.env` file, if any).
//! Command line flags of the binaries take precedence over these values.

use crate::{
    constants::{COINGECKO_API_URL, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RELAY_URL},
    error::ConfigError,
};
use reqwest::Url;
use std::fmt;

/// Settings shared by the relay server and the dashboard
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Relay server bind address (`HOST`)
    pub host: String,
    /// Relay server listen port (`PORT`)
    pub port: u16,
    /// Connection string of the user store (`MONGO_URI`); never connected to
    pub database_url: Option<String>,
    /// Upstream base URL (`COINGECKO_API_URL`)
    pub upstream_url: String,
    /// Relay server base URL used by the dashboard (`RELAY_URL`)
    pub relay_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            upstream_url: COINGECKO_API_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
        }
    }
}

// Connection strings carry credentials; only their presence is printed.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("relay_url", &self.relay_url)
            .finish()
    }
}

impl Config {
    /// Loads `.env` and reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", port))?;
        }
        config.database_url = lookup("MONGO_URI").filter(|uri| !uri.trim().is_empty());
        if let Some(url) = lookup("COINGECKO_API_URL") {
            config.upstream_url = parse_url("COINGECKO_API_URL", url)?;
        }
        if let Some(url) = lookup("RELAY_URL") {
            config.relay_url = parse_url("RELAY_URL", url)?;
        }

        Ok(config)
    }
}

fn parse_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if !url.cannot_be_a_base() => Ok(value),
        _ => Err(ConfigError::invalid(name, value)),
    }
}
