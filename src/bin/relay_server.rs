use anyhow::Result;
use clap::Parser;
use crypto_dashboard::{logging::TraceLevel, relay, CoinGeckoProvider, Config};
use std::sync::Arc;

/// Relays CoinGecko market data on `GET /api/cryptos`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = TraceLevel::Info)]
    trace: TraceLevel,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    crypto_dashboard::logging::init_tracing(cli.trace)?;

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    tracing::debug!(?config, "Configuration loaded");

    let provider = Arc::new(CoinGeckoProvider::with_base_url(&config.upstream_url)?);
    relay::run(&config, provider).await?;

    Ok(())
}
