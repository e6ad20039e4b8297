//! Time-bounded sliding window over feed observations.
//!
//! Append at the tail, evict from the head, both O(1) amortised via a
//! deque. Eviction is time-based, not count-based, so the window never
//! grows without bound under a live feed and never empties once the
//! first observation has landed.

use crate::error::{WindowError, WindowResult};
use crate::types::Observation;
use chrono::Duration;
use std::collections::VecDeque;

/// Numeric field to snapshot for statistics input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Price,
    Volume,
}

/// Ordered buffer of observations for one logical series.
///
/// Timestamps are strictly non-decreasing: insertion order equals
/// arrival order equals time order. An out-of-order push is refused
/// and leaves the window unchanged.
#[derive(Debug, Default)]
pub struct SlidingWindow {
    samples: VecDeque<Observation>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Append an observation at the tail.
    ///
    /// Fails with `WindowError::OutOfOrder` if the observation is
    /// strictly earlier than the current tail. Real feeds are assumed
    /// ordered; the contract is still explicit.
    pub fn push(&mut self, obs: Observation) -> WindowResult<()> {
        if let Some(tail) = self.samples.back() {
            if obs.timestamp < tail.timestamp {
                return Err(WindowError::OutOfOrder {
                    incoming: obs.timestamp,
                    tail: tail.timestamp,
                });
            }
        }
        self.samples.push_back(obs);
        Ok(())
    }

    /// Remove head observations older than `window` relative to the tail.
    ///
    /// Pushes are stamped at processing time, so the tail timestamp is
    /// the current "now". Never evicts the sole remaining element: the
    /// window is never empty after the first push. Must run after every
    /// push, before band recomputation.
    pub fn evict_stale(&mut self, window: Duration) {
        let tail_ts = match self.samples.back() {
            Some(tail) => tail.timestamp,
            None => return,
        };
        while self.samples.len() > 1 {
            let head_ts = self.samples.front().map(|o| o.timestamp);
            match head_ts {
                Some(head_ts) if tail_ts - head_ts >= window => {
                    self.samples.pop_front();
                }
                _ => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recently pushed observation.
    pub fn tail(&self) -> Option<&Observation> {
        self.samples.back()
    }

    /// Read-only ordered snapshot of one numeric field, as statistics input.
    pub fn values(&self, field: SampleField) -> Vec<f64> {
        self.samples
            .iter()
            .map(|o| match field {
                SampleField::Price => o.price.to_f64(),
                SampleField::Volume => o.volume.to_f64(),
            })
            .collect()
    }
}
