//! Integration tests for bandwatch-bot.
//!
//! These tests verify the interaction between components:
//! - WebSocket connection lifecycle
//! - Frame flow from transport to session

pub mod common;
