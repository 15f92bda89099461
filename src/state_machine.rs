//! Streamed-answer accumulation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! every event received for a conversation is folded into the transcript by
//! [`transition`], and [`StreamAccumulator`] owns the resulting values.

mod accumulator;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use accumulator::{Snapshot, StreamAccumulator};
pub use event::Event;
pub use state::ConvState;
pub use transition::transition;
