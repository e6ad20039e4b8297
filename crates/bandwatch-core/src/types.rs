//! Common data types for feed observations and classification output.

use crate::{Price, Volume};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which series an observation belongs to.
///
/// Trade-tape feeds tag observations with the taker direction;
/// order-book feeds tag them with the quote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
    Ask,
    Bid,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::Ask => write!(f, "ask"),
            Self::Bid => write!(f, "bid"),
        }
    }
}

/// Order-book side, used to key the dual-series session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Ask,
    Bid,
}

impl From<BookSide> for Side {
    fn from(side: BookSide) -> Self {
        match side {
            BookSide::Ask => Side::Ask,
            BookSide::Bid => Side::Bid,
        }
    }
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Bid => write!(f, "bid"),
        }
    }
}

/// A single timestamped sample from a feed.
///
/// Immutable once created. Owned exclusively by the `SlidingWindow`
/// that stores it; eviction is the only destruction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Processing-time stamp assigned on push.
    pub timestamp: DateTime<Utc>,
    pub price: Price,
    pub volume: Volume,
    pub side: Side,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, price: Price, volume: Volume, side: Side) -> Self {
        Self {
            timestamp,
            price,
            volume,
            side,
        }
    }
}

/// Which band edge an observation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakoutKind {
    UpperBreak,
    LowerBreak,
}

impl fmt::Display for BreakoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpperBreak => write!(f, "upper"),
            Self::LowerBreak => write!(f, "lower"),
        }
    }
}

/// An observation that fell strictly outside the active band.
///
/// Emitted at most once per qualifying message; the reporter surfaces
/// every event it receives without filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakoutEvent {
    pub kind: BreakoutKind,
    pub price: Price,
    pub volume: Volume,
    /// Set for order-book sessions, absent for trade-tape sessions.
    pub side: Option<BookSide>,
}

impl BreakoutEvent {
    pub fn trade(kind: BreakoutKind, price: Price, volume: Volume) -> Self {
        Self {
            kind,
            price,
            volume,
            side: None,
        }
    }

    pub fn book(kind: BreakoutKind, price: Price, volume: Volume, side: BookSide) -> Self {
        Self {
            kind,
            price,
            volume,
            side: Some(side),
        }
    }
}

/// Sink for breakout events.
///
/// Implementations render events (console, log); they must surface
/// every event handed to them.
pub trait Reporter: Send + Sync {
    fn report(&self, feed: &str, event: &BreakoutEvent);
}
