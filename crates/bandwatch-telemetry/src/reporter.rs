//! Console reporter for breakout events.

use bandwatch_core::{BreakoutEvent, BreakoutKind, Reporter};
use tracing::info;

/// Renders every breakout event as a structured log line.
///
/// No filtering: each event handed to the reporter is surfaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for LogReporter {
    fn report(&self, feed: &str, event: &BreakoutEvent) {
        match (event.kind, event.side) {
            (BreakoutKind::UpperBreak, None) => info!(
                feed,
                price = %event.price,
                volume = %event.volume,
                "Break upper band"
            ),
            (BreakoutKind::LowerBreak, None) => info!(
                feed,
                price = %event.price,
                volume = %event.volume,
                "Break lower band"
            ),
            (kind, Some(side)) => info!(
                feed,
                %side,
                band = %kind,
                price = %event.price,
                volume = %event.volume,
                "Break spread band"
            ),
        }
    }
}
