//! Dual-series session for order-book feeds.
//!
//! Ask and bid each get their own sliding window, but the bounds are
//! cross-coupled into a spread band: the upper bound comes from the
//! bid series (mean + sigma·stddev) and the lower bound from the ask
//! series (mean − sigma·stddev). Ask updates are judged against the
//! lower bound; bid updates against the upper bound, whose magnitude
//! comparison is governed by `enforce_bid_upper_bound`.

use crate::config::SessionConfig;
use crate::error::SessionResult;
use bandwatch_core::{
    mean, population_std_dev, BookSide, BreakoutEvent, BreakoutKind, Observation, Price,
    SampleField, SlidingWindow, Volume,
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Cross-coupled spread bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SpreadBands {
    upper: f64,
    lower: f64,
}

/// One side's window plus its sufficiency gate.
#[derive(Debug, Default)]
struct SideState {
    window: SlidingWindow,
    ready: bool,
}

/// Band state machine over independent ask/bid series.
pub struct OrderBookSession {
    config: SessionConfig,
    ask: SideState,
    bid: SideState,
    bands: SpreadBands,
}

impl OrderBookSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ask: SideState::default(),
            bid: SideState::default(),
            bands: SpreadBands::default(),
        }
    }

    /// Process one top-of-book update. Returns zero, one, or two events
    /// (at most one per side).
    pub fn on_book(
        &mut self,
        now: DateTime<Utc>,
        ask_price: Price,
        ask_volume: Volume,
        bid_price: Price,
        bid_volume: Volume,
    ) -> SessionResult<Vec<BreakoutEvent>> {
        let mut events = Vec::new();

        if self.should_process(BookSide::Ask, ask_price, ask_volume) {
            self.ingest(BookSide::Ask, now, ask_price, ask_volume)?;
            if self.ask.ready && ask_price.to_f64() < self.bands.lower {
                events.push(BreakoutEvent::book(
                    BreakoutKind::LowerBreak,
                    ask_price,
                    ask_volume,
                    BookSide::Ask,
                ));
            }
        }

        if self.should_process(BookSide::Bid, bid_price, bid_volume) {
            self.ingest(BookSide::Bid, now, bid_price, bid_volume)?;
            let breaks_upper =
                !self.config.enforce_bid_upper_bound || bid_price.to_f64() > self.bands.upper;
            if self.bid.ready && breaks_upper {
                events.push(BreakoutEvent::book(
                    BreakoutKind::UpperBreak,
                    bid_price,
                    bid_volume,
                    BookSide::Bid,
                ));
            }
        }

        Ok(events)
    }

    /// Dead-reckoning filter: a side is processed only when the
    /// incoming (price, volume) pair differs from the stored tail pair
    /// in both fields. A change in only one field is ignored.
    fn should_process(&self, side: BookSide, price: Price, volume: Volume) -> bool {
        match self.side(side).window.tail() {
            Some(tail) => tail.price != price && tail.volume != volume,
            None => true,
        }
    }

    fn ingest(
        &mut self,
        side: BookSide,
        now: DateTime<Utc>,
        price: Price,
        volume: Volume,
    ) -> SessionResult<()> {
        let window = self.config.window;
        let state = self.side_mut(side);
        state
            .window
            .push(Observation::new(now, price, volume, side.into()))?;
        state.window.evict_stale(window);
        self.recompute();
        debug!(
            %side,
            ask_samples = self.ask.window.len(),
            bid_samples = self.bid.window.len(),
            upper = self.bands.upper,
            lower = self.bands.lower,
            "Book update ingested"
        );
        Ok(())
    }

    /// Recompute the shared spread bounds and both sufficiency gates.
    fn recompute(&mut self) {
        let ask_prices = self.ask.window.values(SampleField::Price);
        let bid_prices = self.bid.window.values(SampleField::Price);

        self.bands.upper = mean(&bid_prices) + self.config.sigma * population_std_dev(&bid_prices);
        self.bands.lower = mean(&ask_prices) - self.config.sigma * population_std_dev(&ask_prices);

        self.ask.ready = self.ask.window.len() > self.config.min_samples;
        self.bid.ready = self.bid.window.len() > self.config.min_samples;
    }

    fn side(&self, side: BookSide) -> &SideState {
        match side {
            BookSide::Ask => &self.ask,
            BookSide::Bid => &self.bid,
        }
    }

    fn side_mut(&mut self, side: BookSide) -> &mut SideState {
        match side {
            BookSide::Ask => &mut self.ask,
            BookSide::Bid => &mut self.bid,
        }
    }

    /// Current window size for one side.
    pub fn sample_count(&self, side: BookSide) -> usize {
        self.side(side).window.len()
    }

    /// Whether one side's gate is armed.
    pub fn is_ready(&self, side: BookSide) -> bool {
        self.side(side).ready
    }

    /// Current cross-coupled bounds (upper from bid, lower from ask).
    pub fn bounds(&self) -> (f64, f64) {
        (self.bands.upper, self.bands.lower)
    }
}
