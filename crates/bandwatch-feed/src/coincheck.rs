//! Coincheck trade-tape codec.
//!
//! Trade frames arrive as a JSON array:
//! `[id, "btc_jpy", "price", "volume", "side"]`
//! with price and volume as strings and side `"buy"` or `"sell"`.
//! Subscription is an explicit frame on the `{pair}-trades` channel.

use crate::error::{FeedError, FeedResult};
use crate::FeedEvent;
use bandwatch_core::{Price, Side, Volume};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

const PRICE_IDX: usize = 2;
const VOLUME_IDX: usize = 3;
const SIDE_IDX: usize = 4;

#[derive(Debug, Clone)]
pub struct CoincheckTradeCodec {
    /// Subscription channel, e.g. "btc_jpy-trades".
    channel: String,
}

impl CoincheckTradeCodec {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// Subscription frame sent right after connecting.
    pub fn subscribe_frame(&self) -> String {
        serde_json::json!({
            "type": "subscribe",
            "channel": self.channel,
        })
        .to_string()
    }

    pub fn decode(&self, text: &str) -> FeedResult<FeedEvent> {
        let value: Value = serde_json::from_str(text)?;
        let fields = value
            .as_array()
            .ok_or_else(|| FeedError::ParseError("trade frame is not an array".to_string()))?;
        if fields.len() <= SIDE_IDX {
            return Err(FeedError::ParseError(format!(
                "trade frame too short: {} fields",
                fields.len()
            )));
        }

        let price = Price::new(decimal_field(&fields[PRICE_IDX], "price")?);
        let volume = Volume::new(decimal_field(&fields[VOLUME_IDX], "volume")?);
        let side = match fields[SIDE_IDX].as_str() {
            Some("buy") => Side::Buy,
            Some("sell") => Side::Sell,
            other => {
                return Err(FeedError::InvalidData(format!(
                    "unknown trade side: {other:?}"
                )))
            }
        };

        debug!(%price, %volume, ?side, "Trade decoded");
        Ok(FeedEvent::Trade {
            price,
            volume,
            side,
        })
    }
}

/// Numeric field, tolerating both string and number encodings.
fn decimal_field(value: &Value, name: &str) -> FeedResult<Decimal> {
    let parsed = match value {
        Value::String(s) => s.parse::<Decimal>().ok(),
        Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FeedError::InvalidData(format!("bad {name} field: {value}")))
}
