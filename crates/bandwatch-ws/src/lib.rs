//! WebSocket transport for exchange push feeds.
//!
//! Owns the socket lifecycle so the analytics core never sees it:
//! - Automatic reconnection with exponential backoff and jitter
//! - Optional subscribe frame replayed on every (re)connect
//! - Channel-based frame delivery with explicit connect/disconnect
//!   markers so the consumer can reset per-connection state

pub mod connection;
pub mod error;

pub use connection::{ConnectionConfig, ConnectionManager, ConnectionState, TransportEvent};
pub use error::{WsError, WsResult};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
