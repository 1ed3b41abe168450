use anyhow::Result;
use clap::{Parser, ValueEnum};
use crypto_dashboard::{
    constants::DEFAULT_CHART_ASSET, logging::TraceLevel, views::ChartView, CoinGeckoProvider,
    Config, Dashboard, LoadOutcome, MarketDataError, MarketDataProvider, RelayClient,
    ViewStateStore,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    /// Through the relay server
    Relay,
    /// Straight from CoinGecko
    Upstream,
}

/// Prints the crypto market table and a price chart
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Where market data comes from
    #[arg(long, value_enum, default_value_t = Source::Relay)]
    source: Source,

    /// Relay server base URL (overrides RELAY_URL)
    #[arg(long)]
    relay_url: Option<String>,

    /// Asset shown in the chart
    #[arg(long, default_value = DEFAULT_CHART_ASSET)]
    asset: String,

    /// Reload and redraw every N seconds instead of exiting
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = TraceLevel::Info)]
    trace: TraceLevel,
}

/// Logs one line per mount; failures were already logged with their cause
fn report(
    (list, series): (
        Result<LoadOutcome, MarketDataError>,
        Result<LoadOutcome, MarketDataError>,
    ),
) {
    let entries = match list {
        Ok(LoadOutcome::Applied(n)) => Some(n),
        _ => None,
    };
    let points = match series {
        Ok(LoadOutcome::Applied(n)) => Some(n),
        _ => None,
    };
    tracing::info!(?entries, ?points, "Dashboard loaded");
}

fn draw(dashboard: &mut Dashboard) {
    println!("{}\n", dashboard.render());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    crypto_dashboard::logging::init_tracing(cli.trace)?;

    let config = Config::from_env()?;
    let provider: Arc<dyn MarketDataProvider> = match cli.source {
        Source::Relay => {
            let url = cli.relay_url.as_deref().unwrap_or(&config.relay_url);
            Arc::new(RelayClient::new(url)?)
        }
        Source::Upstream => Arc::new(CoinGeckoProvider::with_base_url(&config.upstream_url)?),
    };
    tracing::info!(provider = provider.provider_name(), asset = %cli.asset, "Mounting dashboard");

    let mut dashboard = Dashboard::with_store(
        provider,
        Arc::new(ViewStateStore::new()),
        ChartView::new(&cli.asset),
    );

    report(dashboard.mount().await);
    draw(&mut dashboard);

    let Some(secs) = cli.refresh_secs.filter(|s| *s > 0) else {
        return Ok(());
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report(dashboard.mount().await);
                draw(&mut dashboard);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, exiting");
                return Ok(());
            }
        }
    }
}
