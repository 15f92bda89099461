//! Conversation runtime executor

use super::{RuntimeError, StreamOutcome};
use crate::client::{EventKind, Transport};
use crate::decoder::decode;
use crate::session::{SessionContext, SessionId};
use crate::state_machine::{Event, Snapshot, StreamAccumulator};
use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Generic conversation runtime that can work with any transport
pub struct ConversationRuntime<T>
where
    T: Transport,
{
    session: SessionContext,
    accumulator: StreamAccumulator,
    transport: T,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl<T> ConversationRuntime<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            session: SessionContext::new_session(),
            accumulator: StreamAccumulator::new(),
            transport,
            snapshot_tx,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        self.session.id()
    }

    /// Receive a snapshot after every fold step
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.accumulator.snapshot()
    }

    /// Start a logically new conversation: new session id, empty transcript
    pub fn reset(&mut self) {
        let session_id = self.session.reset();
        tracing::info!(session_id = %session_id, "Conversation reset");
        self.apply(Event::Reset);
    }

    /// Ask a question and consume its answer stream.
    ///
    /// Taking `&mut self` serializes questions: a new stream cannot be opened
    /// into this transcript while another one is still being consumed.
    /// Whatever was accumulated before a transport failure or cancellation
    /// stays in the transcript.
    pub async fn submit(
        &mut self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome, RuntimeError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RuntimeError::EmptyQuestion);
        }

        self.apply(Event::UserMessage {
            text: question.to_string(),
        });

        let mut outcome = StreamOutcome::default();
        let session_id = self.session.id().clone();
        tracing::info!(session_id = %session_id, "Submitting question");

        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            opened = self.transport.open_stream(question, &session_id) => Some(opened),
        };
        let Some(opened) = opened else {
            outcome.cancelled = true;
            tracing::info!(session_id = %session_id, "Question cancelled before stream opened");
            return Ok(outcome);
        };
        let mut stream = opened.inspect_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Failed to open answer stream");
        })?;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    outcome.cancelled = true;
                    break;
                }
                next = stream.next() => next,
            };

            let raw = match next {
                None => break,
                Some(Ok(raw)) => raw,
                Some(Err(e)) => {
                    tracing::error!(
                        session_id = %session_id,
                        error = %e,
                        updates = outcome.updates_applied,
                        malformed = outcome.malformed_events,
                        "Answer stream interrupted"
                    );
                    return Err(e.into());
                }
            };

            match raw.kind() {
                EventKind::Data => match decode(&raw.data) {
                    Ok(update) => {
                        self.apply(Event::Update(update));
                        outcome.updates_applied += 1;
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %session_id, error = %e, "Skipping malformed event");
                        outcome.malformed_events += 1;
                    }
                },
                EventKind::End => break,
                EventKind::Other => {
                    tracing::debug!(session_id = %session_id, event = %raw.event, "Ignoring event");
                    outcome.ignored_events += 1;
                }
            }
        }

        tracing::info!(
            session_id = %session_id,
            updates = outcome.updates_applied,
            malformed = outcome.malformed_events,
            ignored = outcome.ignored_events,
            cancelled = outcome.cancelled,
            turns = self.accumulator.transcript().len(),
            state = %self.accumulator.state(),
            "Answer stream finished"
        );
        Ok(outcome)
    }

    fn apply(&mut self, event: Event) {
        self.accumulator.apply(event);
        self.snapshot_tx.send_replace(self.accumulator.snapshot());
    }
}
