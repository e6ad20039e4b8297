//! Single-series session for trade-tape feeds.
//!
//! Each incoming trade is classified against the bands computed from
//! the *previous* message (stale-by-one: the newest price is compared
//! against bounds that do not yet include it), then pushed and the
//! bands recomputed.

use crate::config::SessionConfig;
use crate::error::SessionResult;
use bandwatch_core::{
    compute_bands, BandSnapshot, BreakoutEvent, BreakoutKind, Observation, Price, SampleField,
    SlidingWindow, Side, Volume,
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Band state machine over one trade-tape series.
pub struct TradeSession {
    config: SessionConfig,
    window: SlidingWindow,
    bands: BandSnapshot,
}

impl TradeSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            window: SlidingWindow::new(),
            bands: BandSnapshot::default(),
        }
    }

    /// Process one trade. Returns at most one breakout event.
    ///
    /// `now` is the processing-time stamp for the observation; eviction
    /// is driven by it, not by any exchange-embedded time.
    pub fn on_trade(
        &mut self,
        now: DateTime<Utc>,
        price: Price,
        volume: Volume,
        side: Side,
    ) -> SessionResult<Option<BreakoutEvent>> {
        // 1. Classify against the previous snapshot.
        let event = self.classify(price, volume);

        // 2. Ingest and evict by elapsed time.
        self.window
            .push(Observation::new(now, price, volume, side))?;
        self.window.evict_stale(self.config.window);

        // 3. Recompute bands and refresh the sufficiency gate.
        let center = self.window.values(SampleField::Price);
        let dispersion = self.window.values(self.config.dispersion_field);
        let mut bands = compute_bands(&center, &dispersion, self.config.sigma);
        bands.sufficient_data = self.window.len() > self.config.min_samples;
        self.bands = bands;

        debug!(
            samples = self.window.len(),
            mean = self.bands.mean,
            upper = self.bands.upper,
            lower = self.bands.lower,
            "Trade ingested"
        );

        Ok(event)
    }

    fn classify(&self, price: Price, volume: Volume) -> Option<BreakoutEvent> {
        if !self.bands.sufficient_data {
            return None;
        }
        let px = price.to_f64();
        if px > self.bands.upper {
            Some(BreakoutEvent::trade(BreakoutKind::UpperBreak, price, volume))
        } else if px < self.bands.lower {
            Some(BreakoutEvent::trade(BreakoutKind::LowerBreak, price, volume))
        } else {
            None
        }
    }

    /// Bands as of the last processed message.
    pub fn bands(&self) -> &BandSnapshot {
        &self.bands
    }

    /// Current window size.
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }
}
