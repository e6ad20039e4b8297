//! Exchange frame codecs.
//!
//! Decodes raw WebSocket text frames into typed feed events for the
//! session layer. Decode failures stay here: a malformed frame is an
//! error the caller logs and drops, never a session input.

pub mod coincheck;
pub mod error;
pub mod zaif;

pub use coincheck::CoincheckTradeCodec;
pub use error::{FeedError, FeedResult};
pub use zaif::ZaifBookCodec;

use bandwatch_core::{Price, Side, Volume};

/// A decoded, typed feed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// One execution from a trade tape.
    Trade {
        price: Price,
        volume: Volume,
        side: Side,
    },
    /// Top-of-book quote from an order-book stream.
    BookTop {
        ask_price: Price,
        ask_volume: Volume,
        bid_price: Price,
        bid_volume: Volume,
    },
}

/// Statically dispatched codec for one configured feed.
#[derive(Debug, Clone)]
pub enum FeedCodec {
    CoincheckTrade(CoincheckTradeCodec),
    ZaifBook(ZaifBookCodec),
}

impl FeedCodec {
    /// Subscription frame to send right after connecting, if the
    /// exchange requires one (Zaif subscribes via the URL instead).
    pub fn subscribe_frame(&self) -> Option<String> {
        match self {
            Self::CoincheckTrade(codec) => Some(codec.subscribe_frame()),
            Self::ZaifBook(_) => None,
        }
    }

    pub fn decode(&self, text: &str) -> FeedResult<FeedEvent> {
        match self {
            Self::CoincheckTrade(codec) => codec.decode(text),
            Self::ZaifBook(codec) => codec.decode(text),
        }
    }
}
