//! Conversation state types

/// Accumulation state of the current conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// No assistant turn is being built; the next update starts a new one
    #[default]
    Idle,
    /// The last turn is an assistant turn still receiving fragments
    Accumulating,
}

impl std::fmt::Display for ConvState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvState::Idle => write!(f, "idle"),
            ConvState::Accumulating => write!(f, "accumulating"),
        }
    }
}
