//! Pure state transition function
//!
//! Given the current state, the current transcript and one event, produce
//! the next state and transcript. Total: every event yields a valid result.

use super::{ConvState, Event};
use crate::decoder::StreamUpdate;
use crate::transcript::{Transcript, Turn};

/// Result of a state transition
#[derive(Debug, Clone)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub transcript: Transcript,
}

impl TransitionResult {
    pub fn new(state: ConvState, transcript: Transcript) -> Self {
        Self {
            new_state: state,
            transcript,
        }
    }
}

/// Pure transition function
///
/// The transcript is taken by value: when the caller holds the only
/// reference the last turn is updated without copying, otherwise the
/// storage is cloned and outstanding snapshots keep the old contents.
pub fn transition(state: ConvState, mut transcript: Transcript, event: Event) -> TransitionResult {
    match (state, event) {
        // ============================================================
        // User Message Handling
        // ============================================================

        // Any state + UserMessage -> Idle, so the next update opens a new reply
        (_, Event::UserMessage { text }) => {
            transcript.push(Turn::user(text));
            TransitionResult::new(ConvState::Idle, transcript)
        }

        (_, Event::Reset) => {
            transcript.clear();
            TransitionResult::new(ConvState::Idle, transcript)
        }

        // ============================================================
        // Stream Updates
        // ============================================================

        // Idle + Update -> Accumulating (new assistant turn)
        (ConvState::Idle, Event::Update(update)) => {
            start_reply(&mut transcript, update);
            TransitionResult::new(ConvState::Accumulating, transcript)
        }

        // Accumulating + Update -> Accumulating (extend the last turn)
        (ConvState::Accumulating, Event::Update(update)) => {
            // A state that disagrees with the transcript tail falls back to a fresh reply
            if !transcript.extend_last(&update.text_fragment, &update.new_sources) {
                start_reply(&mut transcript, update);
            }
            TransitionResult::new(ConvState::Accumulating, transcript)
        }
    }
}

fn start_reply(transcript: &mut Transcript, update: StreamUpdate) {
    transcript.push(Turn::assistant(update.text_fragment, update.new_sources));
}
