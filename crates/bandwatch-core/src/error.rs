//! Core error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Out-of-order observation: incoming {incoming} is earlier than tail {tail}")]
    OutOfOrder {
        incoming: DateTime<Utc>,
        tail: DateTime<Utc>,
    },
}

pub type WindowResult<T> = Result<T, WindowError>;
