//! Events that can occur in a conversation

use crate::decoder::StreamUpdate;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    UserMessage { text: String },

    // Stream events
    Update(StreamUpdate),

    /// Start a logically new conversation
    Reset,
}

impl From<StreamUpdate> for Event {
    fn from(update: StreamUpdate) -> Self {
        Event::Update(update)
    }
}
