//! Band breakout monitor application.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, DispersionField, FeedConfig, FeedKind, ReconnectConfig};
pub use error::{AppError, AppResult};
