//! Zaif order-book codec.
//!
//! Depth frames carry full ladders as numeric pairs:
//! `{"asks": [[price, volume], ..], "bids": [[price, volume], ..]}`.
//! Only the top level of each side feeds the session. There is no
//! subscribe frame; the currency pair is selected in the stream URL.

use crate::error::{FeedError, FeedResult};
use crate::FeedEvent;
use bandwatch_core::{Price, Volume};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct DepthFrame {
    asks: Vec<(Decimal, Decimal)>,
    bids: Vec<(Decimal, Decimal)>,
}

#[derive(Debug, Clone, Default)]
pub struct ZaifBookCodec;

impl ZaifBookCodec {
    pub fn new() -> Self {
        Self
    }

    /// Stream URL for a currency pair.
    pub fn stream_url(base: &str, currency_pair: &str) -> String {
        format!("{base}/stream?currency_pair={currency_pair}")
    }

    pub fn decode(&self, text: &str) -> FeedResult<FeedEvent> {
        let frame: DepthFrame = serde_json::from_str(text)?;
        let (ask_price, ask_volume) = frame
            .asks
            .first()
            .copied()
            .ok_or_else(|| FeedError::InvalidData("empty ask ladder".to_string()))?;
        let (bid_price, bid_volume) = frame
            .bids
            .first()
            .copied()
            .ok_or_else(|| FeedError::InvalidData("empty bid ladder".to_string()))?;

        debug!(ask = %ask_price, bid = %bid_price, "Book top decoded");
        Ok(FeedEvent::BookTop {
            ask_price: Price::new(ask_price),
            ask_volume: Volume::new(ask_volume),
            bid_price: Price::new(bid_price),
            bid_volume: Volume::new(bid_volume),
        })
    }
}
