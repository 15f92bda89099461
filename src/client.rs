//! RAG service client
//!
//! Provides the streaming transport used for questions plus the one-shot
//! collaborators (login/register, document upload and ingest).

mod auth;
mod documents;
mod error;
mod rag;

pub use auth::AuthAction;
pub use error::{AuthError, DocumentError, TransportError, TransportErrorKind};
pub use rag::RagClient;

use crate::session::SessionId;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Event kind carrying an answer payload
pub const DATA_EVENT: &str = "data";
/// Event kind sent by the server after the last payload
pub const END_EVENT: &str = "end";

/// One server-sent event as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub event: String,
    pub data: String,
}

impl RawEvent {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn data(data: impl Into<String>) -> Self {
        Self::new(DATA_EVENT, data)
    }

    pub fn kind(&self) -> EventKind {
        match self.event.as_str() {
            DATA_EVENT => EventKind::Data,
            END_EVENT => EventKind::End,
            _ => EventKind::Other,
        }
    }
}

/// Classification of raw events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Data,
    End,
    Other,
}

/// Sequence of raw events for one question; ends when the server is done
pub type RawEventStream = BoxStream<'static, Result<RawEvent, TransportError>>;

/// Opens one long-lived streaming request per question
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open_stream(
        &self,
        question: &str,
        session_id: &SessionId,
    ) -> Result<RawEventStream, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn open_stream(
        &self,
        question: &str,
        session_id: &SessionId,
    ) -> Result<RawEventStream, TransportError> {
        (**self).open_stream(question, session_id).await
    }
}
