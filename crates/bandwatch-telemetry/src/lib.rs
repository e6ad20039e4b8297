//! Structured logging and breakout reporting.

pub mod error;
pub mod logging;
pub mod reporter;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use reporter::LogReporter;
