//! Band breakout monitor - entry point.
//!
//! Maintains mean ± sigma·stddev bands over streaming exchange feeds
//! and logs every observation that falls outside the current band.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Band breakout monitor over exchange push feeds
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BANDWATCH_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    bandwatch_ws::init_crypto();

    let args = Args::parse();

    bandwatch_telemetry::init_logging()?;

    info!("Starting bandwatch v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > BANDWATCH_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("BANDWATCH_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = bandwatch_bot::AppConfig::from_file(&config_path)?;
    info!(
        window_secs = config.window_secs,
        sigma = config.sigma,
        min_samples = config.min_samples,
        feed_count = config.feeds.len(),
        "Configuration loaded"
    );

    let app = bandwatch_bot::Application::new(config);
    app.run().await;

    Ok(())
}
