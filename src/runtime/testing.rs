//! Mock implementations for testing
//!
//! These mocks enable runtime testing without real I/O.

use crate::client::{RawEvent, RawEventStream, Transport, TransportError};
use crate::session::SessionId;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

type MockEvent = Result<RawEvent, TransportError>;

enum QueuedStream {
    Events(Vec<MockEvent>),
    Channel(mpsc::UnboundedReceiver<MockEvent>),
    OpenError(TransportError),
}

/// Mock transport that replays queued streams, one per question
#[derive(Clone, Default)]
pub struct MockTransport {
    streams: Arc<Mutex<VecDeque<QueuedStream>>>,
    /// Record of all `(question, session_id)` pairs
    requests: Arc<Mutex<Vec<(String, SessionId)>>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a complete stream for the next question
    pub fn queue_events(&self, events: Vec<MockEvent>) {
        self.streams
            .lock()
            .unwrap()
            .push_back(QueuedStream::Events(events));
    }

    /// Queue a stream fed by the returned sender; it ends when the sender drops
    pub fn queue_channel(&self) -> mpsc::UnboundedSender<MockEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams
            .lock()
            .unwrap()
            .push_back(QueuedStream::Channel(rx));
        tx
    }

    /// Make the next `open_stream` call fail
    pub fn fail_next_open(&self, error: TransportError) {
        self.streams
            .lock()
            .unwrap()
            .push_back(QueuedStream::OpenError(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<(String, SessionId)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open_stream(
        &self,
        question: &str,
        session_id: &SessionId,
    ) -> Result<RawEventStream, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((question.to_string(), session_id.clone()));

        let queued = self.streams.lock().unwrap().pop_front();
        match queued {
            Some(QueuedStream::Events(events)) => Ok(futures::stream::iter(events).boxed()),
            Some(QueuedStream::Channel(rx)) => Ok(UnboundedReceiverStream::new(rx).boxed()),
            Some(QueuedStream::OpenError(error)) => Err(error),
            None => Err(TransportError::network("No mock stream queued")),
        }
    }
}
