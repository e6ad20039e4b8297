//! Application configuration.
//!
//! Loaded once at startup from a TOML file and handed to each feed
//! task by value; there are no process-wide mutable globals.

use crate::error::{AppError, AppResult};
use bandwatch_core::SampleField;
use bandwatch_session::SessionConfig;
use bandwatch_ws::ConnectionConfig;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Which session variant a feed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Single-series trade tape (Coincheck executions).
    Trade,
    /// Dual-series order book top (Zaif depth).
    OrderBook,
}

/// Which field feeds the trade session's dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispersionField {
    Price,
    /// Reference behavior: volume dispersion bounding price.
    #[default]
    Volume,
}

impl From<DispersionField> for SampleField {
    fn from(field: DispersionField) -> Self {
        match field {
            DispersionField::Price => SampleField::Price,
            DispersionField::Volume => SampleField::Volume,
        }
    }
}

/// One feed to run: endpoint plus session variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed name used in log lines (e.g. "coincheck", "zaif").
    pub name: String,
    /// WebSocket endpoint. For order-book feeds this is the base URL;
    /// the currency pair is appended as a query parameter.
    pub url: String,
    pub kind: FeedKind,
    /// Subscription channel for trade feeds (e.g. "btc_jpy-trades").
    #[serde(default)]
    pub channel: Option<String>,
    /// Currency pair for order-book feeds (e.g. "btc_jpy").
    #[serde(default)]
    pub currency_pair: Option<String>,
    /// Dispersion field override for trade feeds.
    #[serde(default)]
    pub dispersion: DispersionField,
    /// Apply the bid-side upper-band magnitude comparison. Off by
    /// default to match the reference behavior.
    #[serde(default)]
    pub enforce_bid_upper_bound: bool,
}

/// Reconnect settings shared by all feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Maximum reconnection attempts (0 = infinite). Default: 0.
    #[serde(default)]
    pub max_attempts: u32,
    /// Base delay for exponential backoff (ms). Default: 1000.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum backoff delay (ms). Default: 60000.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Band window span (seconds). Default: 600 (10 minutes).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Band width multiplier. Default: 1.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Bounds activate once a window holds strictly more than this
    /// many samples. Default: 10.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Feeds to run, one session task each.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

fn default_window_secs() -> u64 {
    600
}

fn default_sigma() -> f64 {
    1.0
}

fn default_min_samples() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            sigma: default_sigma(),
            min_samples: default_min_samples(),
            reconnect: ReconnectConfig::default(),
            feeds: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.sigma <= 0.0 {
            return Err(AppError::Config("sigma must be positive".to_string()));
        }
        if self.min_samples == 0 {
            return Err(AppError::Config(
                "min_samples must be positive".to_string(),
            ));
        }
        for feed in &self.feeds {
            match feed.kind {
                FeedKind::Trade if feed.channel.is_none() => {
                    return Err(AppError::Config(format!(
                        "feed {}: trade feeds need a channel",
                        feed.name
                    )));
                }
                FeedKind::OrderBook if feed.currency_pair.is_none() => {
                    return Err(AppError::Config(format!(
                        "feed {}: order-book feeds need a currency_pair",
                        feed.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Session configuration for one feed.
    pub fn session_config(&self, feed: &FeedConfig) -> SessionConfig {
        SessionConfig {
            window: Duration::seconds(self.window_secs as i64),
            sigma: self.sigma,
            min_samples: self.min_samples,
            dispersion_field: feed.dispersion.into(),
            enforce_bid_upper_bound: feed.enforce_bid_upper_bound,
        }
    }

    /// Transport configuration for one feed.
    pub fn connection_config(&self, feed: &FeedConfig, subscribe_frame: Option<String>) -> ConnectionConfig {
        let url = match feed.kind {
            FeedKind::Trade => feed.url.clone(),
            FeedKind::OrderBook => {
                let pair = feed.currency_pair.as_deref().unwrap_or("btc_jpy");
                bandwatch_feed::ZaifBookCodec::stream_url(&feed.url, pair)
            }
        };
        ConnectionConfig {
            url,
            subscribe_frame,
            max_reconnect_attempts: self.reconnect.max_attempts,
            reconnect_base_delay_ms: self.reconnect.base_delay_ms,
            reconnect_max_delay_ms: self.reconnect.max_delay_ms,
        }
    }
}
