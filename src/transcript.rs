//! Conversation transcript
//!
//! An ordered, append-only list of turns. Both the list and each turn sit
//! behind an `Arc`, so cloning a transcript is cheap and a clone held by a
//! reader is never affected by later mutations (copy-on-write). Extending
//! the last turn copies only that turn; earlier turns stay shared.

use std::sync::Arc;

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    text: String,
    is_user: bool,
    sources: Vec<String>,
}

impl Turn {
    /// A user turn. Its text and (empty) sources never change afterwards.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            sources: Vec::new(),
        }
    }

    /// An assistant turn seeded with the first fragment of a reply
    pub fn assistant(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            sources,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// Ordered sequence of turns, insertion order = conversation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Arc<Vec<Arc<Turn>>>,
}

impl Transcript {
    #[allow(dead_code)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Arc<Turn>] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last().map(|turn| &**turn)
    }

    /// Append a turn at the end of the conversation
    pub fn push(&mut self, turn: Turn) {
        Arc::make_mut(&mut self.turns).push(Arc::new(turn));
    }

    /// Extend the last turn with a fragment and a batch of sources.
    ///
    /// Returns `false` (and changes nothing) when there is no last turn or
    /// the last turn belongs to the user.
    pub fn extend_last(&mut self, fragment: &str, sources: &[String]) -> bool {
        if !self.last().is_some_and(|turn| !turn.is_user) {
            return false;
        }
        let Some(last) = Arc::make_mut(&mut self.turns).last_mut() else {
            return false;
        };
        let last = Arc::make_mut(last);
        last.text.push_str(fragment);
        last.sources.extend_from_slice(sources);
        true
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns = Arc::default();
    }
}

#[cfg(test)]
impl PartialEq<Turn> for Arc<Turn> {
    fn eq(&self, other: &Turn) -> bool {
        **self == *other
    }
}
