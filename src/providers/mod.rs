//! Market data provider implementations

pub mod coingecko;
pub mod metered;
pub mod relay;

pub use coingecko::CoinGeckoProvider;
pub use metered::MeteredProvider;
pub use relay::RelayClient;

use crate::error::MarketDataError;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

/// Appends path segments to a base URL, percent-encoding each segment
pub(crate) fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, MarketDataError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| MarketDataError::invalid(format!("bad base URL {}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| MarketDataError::invalid(format!("base URL cannot have a path: {}", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Maps the status to an error, then decodes the body as JSON
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    source: &str,
) -> Result<T, MarketDataError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MarketDataError::upstream(status.as_u16(), body));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        MarketDataError::decode(format!(
            "Failed to parse {} response: {}. Response: {}",
            source, e, text
        ))
    })
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Throwaway local HTTP server standing in for an upstream

    use actix_web::{web, App, HttpServer};

    /// Serves the configured routes on an ephemeral port and returns its base URL
    ///
    /// Must be called from inside an actix runtime (`#[actix_web::test]`).
    pub fn spawn<F>(configure: F) -> String
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let server = HttpServer::new(move || App::new().configure(configure.clone()))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }
}
