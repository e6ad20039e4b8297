//! Session error types.

use bandwatch_core::WindowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

pub type SessionResult<T> = Result<T, SessionError>;
