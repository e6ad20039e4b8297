//! WebSocket connection manager.
//!
//! Handles connection lifecycle, automatic reconnection with
//! exponential backoff, and subscribe-frame replay after reconnection.
//! Decoded payloads never live here: frames are forwarded verbatim and
//! the consumer is told about every connect and disconnect so it can
//! start per-connection state from scratch.

use crate::error::{WsError, WsResult};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// WebSocket URL.
    pub url: String,
    /// Frame to send right after connecting (subscription handshake).
    /// None for exchanges that subscribe via the URL.
    pub subscribe_frame: Option<String>,
    /// Maximum reconnection attempts (0 = infinite).
    pub max_reconnect_attempts: u32,
    /// Base delay for exponential backoff.
    pub reconnect_base_delay_ms: u64,
    /// Maximum delay for exponential backoff.
    pub reconnect_max_delay_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            subscribe_frame: None,
            max_reconnect_attempts: 0, // Infinite
            reconnect_base_delay_ms: 1000,
            reconnect_max_delay_ms: 60000,
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// What the transport tells its consumer.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A connection was (re)established after any subscribe frame was
    /// sent. The consumer should reset per-connection state.
    Connected,
    /// One raw text frame.
    Frame(String),
    /// The connection dropped; a reconnect follows unless shutting down.
    Disconnected { reason: String },
}

/// WebSocket connection manager for one feed.
pub struct ConnectionManager {
    config: ConnectionConfig,
    state: Arc<RwLock<ConnectionState>>,
    message_tx: mpsc::Sender<TransportEvent>,
    shutdown_token: CancellationToken,
}

impl ConnectionManager {
    pub fn new(
        config: ConnectionConfig,
        message_tx: mpsc::Sender<TransportEvent>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            message_tx,
            shutdown_token,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Connect and run the read loop, reconnecting until shutdown.
    pub async fn run(&self) -> WsResult<()> {
        let mut attempt = 0u32;

        loop {
            if self.is_shutdown() {
                info!("Shutdown requested, exiting connect loop");
                *self.state.write() = ConnectionState::Disconnected;
                return Ok(());
            }

            *self.state.write() = ConnectionState::Connecting;

            let reason = match self.try_connect().await {
                Ok(()) => {
                    info!(url = %self.config.url, "WebSocket connection closed");
                    "stream ended".to_string()
                }
                Err(e) => {
                    error!(?e, url = %self.config.url, "WebSocket connection error");
                    e.to_string()
                }
            };
            self.forward(TransportEvent::Disconnected { reason }).await;

            if self.is_shutdown() {
                info!("Shutdown requested after disconnect, not reconnecting");
                *self.state.write() = ConnectionState::Disconnected;
                return Ok(());
            }

            attempt += 1;
            if self.config.max_reconnect_attempts > 0
                && attempt >= self.config.max_reconnect_attempts
            {
                error!(attempt, "Max reconnection attempts reached");
                return Err(WsError::ConnectionFailed(
                    "Max reconnection attempts reached".to_string(),
                ));
            }

            *self.state.write() = ConnectionState::Reconnecting;

            let delay = calculate_backoff_delay(
                attempt,
                self.config.reconnect_base_delay_ms,
                self.config.reconnect_max_delay_ms,
            );
            warn!(attempt, delay_ms = delay.as_millis(), "Reconnecting");

            // Wait for delay OR shutdown signal (cancellation-aware sleep)
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during backoff, exiting");
                    *self.state.write() = ConnectionState::Disconnected;
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect(&self) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to WebSocket");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = ConnectionState::Connected;
        info!("WebSocket connected");

        if let Some(frame) = &self.config.subscribe_frame {
            write
                .send(Message::Text(frame.clone()))
                .await
                .map_err(|e| WsError::SendFailed(e.to_string()))?;
            info!("Subscribe frame sent");
        }
        self.forward(TransportEvent::Connected).await;

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in message loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        warn!(?e, "Failed to send Close frame during shutdown");
                    }
                    *self.state.write() = ConnectionState::Disconnected;
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.forward(TransportEvent::Frame(text)).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "WebSocket closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(?e, "WebSocket read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    async fn forward(&self, event: TransportEvent) {
        if self.message_tx.send(event).await.is_err() {
            warn!("Transport event receiver dropped");
        }
    }
}

/// Exponential backoff: base * 2^(attempt-1), capped, plus jitter.
fn calculate_backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let delay = base_ms.saturating_mul(1u64 << exponent);
    let delay = delay.min(max_ms);
    Duration::from_millis(delay + rand_jitter())
}

/// Generate random jitter (0-1000ms).
fn rand_jitter() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_reconnects_forever() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_reconnect_attempts, 0);
        assert_eq!(config.reconnect_base_delay_ms, 1000);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let d1 = calculate_backoff_delay(1, 1000, 60000);
        let d2 = calculate_backoff_delay(2, 1000, 60000);
        let d4 = calculate_backoff_delay(4, 1000, 60000);
        let dbig = calculate_backoff_delay(30, 1000, 60000);

        // Jitter adds at most 1s on top of the deterministic part.
        assert!(d1 >= Duration::from_millis(1000) && d1 < Duration::from_millis(2000));
        assert!(d2 >= Duration::from_millis(2000) && d2 < Duration::from_millis(3000));
        assert!(d4 >= Duration::from_millis(8000) && d4 < Duration::from_millis(9000));
        assert!(dbig >= Duration::from_millis(60000) && dbig < Duration::from_millis(61000));
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let manager =
            ConnectionManager::new(ConnectionConfig::default(), tx, CancellationToken::new());
        manager.forward(TransportEvent::Connected).await;
        manager
            .forward(TransportEvent::Frame("{}".to_string()))
            .await;

        assert!(matches!(rx.recv().await, Some(TransportEvent::Connected)));
        match rx.recv().await {
            Some(TransportEvent::Frame(text)) => assert_eq!(text, "{}"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
