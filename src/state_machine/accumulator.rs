//! Owner of the conversation state and transcript

use super::{transition, ConvState, Event};
use crate::transcript::Transcript;

/// Immutable view of the conversation after a fold step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub transcript: Transcript,
    pub state: ConvState,
    /// Number of resets so far. Readers that skip snapshots compare it to
    /// notice a cleared transcript they never saw empty.
    pub generation: u64,
}

/// Folds events into the transcript one at a time.
///
/// There is exactly one writer (`apply`); readers only ever see
/// [`Snapshot`] values, which share storage with the accumulator until the
/// next mutation copies it.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    state: ConvState,
    transcript: Transcript,
    generation: u64,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConvState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Apply one event
    pub fn apply(&mut self, event: Event) {
        if matches!(event, Event::Reset) {
            self.generation += 1;
        }
        let transcript = std::mem::take(&mut self.transcript);
        let result = transition(self.state, transcript, event);
        self.state = result.new_state;
        self.transcript = result.transcript;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transcript: self.transcript.clone(),
            state: self.state,
            generation: self.generation,
        }
    }
}
