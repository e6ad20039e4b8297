//! Per-feed band state machines.
//!
//! Two variants, dispatched statically rather than via runtime
//! inheritance:
//! - `TradeSession`: single series over a trade tape
//! - `OrderBookSession`: independent ask/bid series with cross-side
//!   spread bounds
//!
//! Sessions are share-nothing: each is owned by exactly one feed task
//! and processes messages strictly in arrival order.

pub mod book;
pub mod config;
pub mod error;
pub mod trade;

pub use book::OrderBookSession;
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use trade::TradeSession;
