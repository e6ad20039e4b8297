//! Core domain types and statistics for the bandwatch monitor.
//!
//! This crate provides the pieces every feed shares:
//! - `Price`, `Volume`: precision-safe numeric types
//! - `Observation`, `Side`: a single timestamped feed sample
//! - `SlidingWindow`: time-bounded observation buffer with head eviction
//! - `compute_bands`: mean ± sigma·stddev band estimation
//! - `BreakoutEvent`, `Reporter`: classification output and its sink

pub mod bands;
pub mod decimal;
pub mod error;
pub mod types;
pub mod window;

pub use bands::{compute_bands, mean, population_std_dev, BandSnapshot};
pub use decimal::{Price, Volume};
pub use error::{WindowError, WindowResult};
pub use types::{BookSide, BreakoutEvent, BreakoutKind, Observation, Reporter, Side};
pub use window::{SampleField, SlidingWindow};
