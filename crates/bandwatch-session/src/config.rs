//! Session configuration.
//!
//! Fixed for the session's lifetime; constructed once at startup from
//! the application config. No process-wide mutable globals.

use bandwatch_core::SampleField;
use chrono::Duration;

/// Configuration shared by both session variants.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Time span defining which observations are "current".
    pub window: Duration,
    /// Band width multiplier (mean ± sigma·stddev).
    pub sigma: f64,
    /// Bounds are usable only once a window holds strictly more than
    /// this many observations.
    pub min_samples: usize,
    /// Which field feeds the trade session's dispersion. The source
    /// design disperses volume while meaning price; kept configurable
    /// rather than silently corrected.
    pub dispersion_field: SampleField,
    /// Whether the bid-side upper-band magnitude comparison is applied.
    /// The reference behavior short-circuits it (every changed bid
    /// update past the gate reports); intent is ambiguous, so this is a
    /// named flag defaulting to the reference behavior.
    pub enforce_bid_upper_bound: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window: Duration::minutes(10),
            sigma: 1.0,
            min_samples: 10,
            dispersion_field: SampleField::Volume,
            enforce_bid_upper_bound: false,
        }
    }
}
