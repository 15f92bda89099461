//! Conversation correlation identifier

use std::fmt;

/// Opaque token scoping server-side state to one conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the session id of the current conversation.
///
/// Created once at conversation start; [`SessionContext::reset`] is the only
/// way to begin a logically new conversation. The transcript lives elsewhere
/// and must be cleared by the caller at the same time.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: SessionId,
}

impl SessionContext {
    pub fn new_session() -> Self {
        Self {
            id: SessionId::generate(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Discard the current id and return the new one
    pub fn reset(&mut self) -> &SessionId {
        self.id = SessionId::generate();
        &self.id
    }
}
