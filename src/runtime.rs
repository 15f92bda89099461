//! Runtime for executing conversations
//!
//! Drives one question at a time through the transport, folding every
//! decoded event into the transcript and publishing snapshots to observers.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;

use crate::client::TransportError;
use thiserror::Error;

/// Counters describing how one stream was consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Data events decoded and folded into the transcript
    pub updates_applied: usize,
    /// Data events dropped because their payload could not be decoded
    pub malformed_events: usize,
    /// Events of other kinds (metadata, keep-alives, ...)
    pub ignored_events: usize,
    /// Stream stopped by the caller before the server finished
    pub cancelled: bool,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("Answer stream failed: {0}")]
    Transport(#[from] TransportError),
}
