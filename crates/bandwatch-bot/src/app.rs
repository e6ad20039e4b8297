//! Main application orchestration.
//!
//! One tokio task per configured feed, share-nothing: each task owns
//! its transport, codec, and session. A feed's failure never touches
//! the others; ctrl-c cancels a shared token and every task drains out.

use crate::config::{AppConfig, FeedConfig, FeedKind};
use bandwatch_core::Reporter;
use bandwatch_feed::{CoincheckTradeCodec, FeedCodec, FeedEvent, ZaifBookCodec};
use bandwatch_session::{OrderBookSession, SessionConfig, SessionError, TradeSession};
use bandwatch_telemetry::LogReporter;
use bandwatch_ws::{ConnectionManager, TransportEvent};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Transport event channel depth per feed.
const FEED_CHANNEL_CAPACITY: usize = 1024;

/// Session variant, dispatched statically by feed kind.
enum FeedSession {
    Trade(TradeSession),
    Book(OrderBookSession),
}

impl FeedSession {
    fn new(kind: FeedKind, config: SessionConfig) -> Self {
        match kind {
            FeedKind::Trade => Self::Trade(TradeSession::new(config)),
            FeedKind::OrderBook => Self::Book(OrderBookSession::new(config)),
        }
    }

    /// Feed one decoded event through the state machine.
    fn on_event(
        &mut self,
        event: FeedEvent,
    ) -> Result<Vec<bandwatch_core::BreakoutEvent>, SessionError> {
        let now = Utc::now();
        match (self, event) {
            (
                Self::Trade(session),
                FeedEvent::Trade {
                    price,
                    volume,
                    side,
                },
            ) => Ok(session.on_trade(now, price, volume, side)?.into_iter().collect()),
            (
                Self::Book(session),
                FeedEvent::BookTop {
                    ask_price,
                    ask_volume,
                    bid_price,
                    bid_volume,
                },
            ) => session.on_book(now, ask_price, ask_volume, bid_price, bid_volume),
            // Codec and session are built from the same feed kind, so a
            // mismatch means a wiring bug; drop the event loudly.
            (_, event) => {
                error!(?event, "Event shape does not match session variant");
                Ok(Vec::new())
            }
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    reporter: Arc<LogReporter>,
    shutdown_token: CancellationToken,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(LogReporter::new()),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token observed by every feed task.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Spawn all feed tasks and run until ctrl-c.
    pub async fn run(&self) {
        if self.config.feeds.is_empty() {
            warn!("No feeds configured, nothing to do");
            return;
        }

        let mut tasks = Vec::new();
        for feed in &self.config.feeds {
            let feed = feed.clone();
            let session_config = self.config.session_config(&feed);
            let codec = build_codec(&feed);
            let connection_config = self.config.connection_config(&feed, codec.subscribe_frame());
            let reporter = Arc::clone(&self.reporter);
            let token = self.shutdown_token.child_token();

            info!(feed = %feed.name, url = %connection_config.url, "Starting feed task");
            tasks.push(tokio::spawn(run_feed(
                feed,
                session_config,
                connection_config,
                codec,
                reporter,
                token,
            )));
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-c received, shutting down");
                self.shutdown_token.cancel();
            }
            () = self.shutdown_token.cancelled() => {}
        }

        for task in tasks {
            if let Err(e) = task.await {
                error!(?e, "Feed task panicked");
            }
        }
        info!("All feed tasks stopped");
    }
}

fn build_codec(feed: &FeedConfig) -> FeedCodec {
    match feed.kind {
        FeedKind::Trade => FeedCodec::CoincheckTrade(CoincheckTradeCodec::new(
            feed.channel.as_deref().unwrap_or("btc_jpy-trades"),
        )),
        FeedKind::OrderBook => FeedCodec::ZaifBook(ZaifBookCodec::new()),
    }
}

/// Run one feed: transport in a subtask, session fed from its channel.
///
/// Every `Connected` marker rebuilds the session from scratch: no state
/// survives a reconnect, so the statistics stay honest after a gap.
async fn run_feed(
    feed: FeedConfig,
    session_config: SessionConfig,
    connection_config: bandwatch_ws::ConnectionConfig,
    codec: FeedCodec,
    reporter: Arc<LogReporter>,
    token: CancellationToken,
) {
    let (tx, mut rx) = mpsc::channel(FEED_CHANNEL_CAPACITY);
    let manager = ConnectionManager::new(connection_config, tx, token.clone());

    let transport = tokio::spawn(async move {
        if let Err(e) = manager.run().await {
            error!(?e, "Transport stopped with error");
        }
    });

    let mut session = FeedSession::new(feed.kind, session_config);

    while let Some(event) = rx.recv().await {
        match event {
            TransportEvent::Connected => {
                info!(feed = %feed.name, "Connected, starting fresh session state");
                session = FeedSession::new(feed.kind, session_config);
            }
            TransportEvent::Disconnected { reason } => {
                warn!(feed = %feed.name, %reason, "Feed disconnected");
            }
            TransportEvent::Frame(text) => {
                let decoded = match codec.decode(&text) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        // Malformed frames never reach the session.
                        warn!(feed = %feed.name, %e, "Dropping undecodable frame");
                        continue;
                    }
                };
                match session.on_event(decoded) {
                    Ok(events) => {
                        for event in &events {
                            reporter.report(&feed.name, event);
                        }
                    }
                    Err(e) => {
                        // The push was refused and the window left
                        // unchanged; keep consuming.
                        warn!(feed = %feed.name, %e, "Observation rejected");
                    }
                }
            }
        }
    }

    if let Err(e) = transport.await {
        error!(?e, feed = %feed.name, "Transport task panicked");
    }
    info!(feed = %feed.name, "Feed task stopped");
}
