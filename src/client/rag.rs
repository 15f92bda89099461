//! HTTP client for the RAG service

use super::{RawEvent, RawEventStream, Transport, TransportError};
use crate::config::{endpoint, ClientConfig};
use crate::session::SessionId;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{Client, Url};
use reqwest_eventsource::{retry::Never, Event, EventSource};
use serde_json::{json, Value};

/// Client for every endpoint of the RAG service
#[derive(Debug, Clone)]
pub struct RagClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
}

impl RagClient {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        // No overall timeout: answers stream for as long as the model talks
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn url(&self, segments: &[&str]) -> Url {
        endpoint(&self.base_url, segments)
    }
}

/// Request body for `POST /rag/stream`
pub fn stream_request_body(question: &str, session_id: &SessionId) -> Value {
    json!({
        "input": {
            "question": question,
        },
        "config": {
            "configurable": {
                "sessionId": session_id.as_str(),
            }
        }
    })
}

/// Adapt an event source into the transport's event stream.
///
/// The connection handshake is skipped, `StreamEnded` is a clean end, and
/// any other error is yielded once as the final item.
fn raw_events<S>(source: S) -> RawEventStream
where
    S: Stream<Item = Result<Event, reqwest_eventsource::Error>> + Send + Unpin + 'static,
{
    futures::stream::unfold(Some(source), |source| async move {
        let mut source = source?;
        loop {
            match source.next().await {
                Some(Ok(Event::Open)) => {}
                Some(Ok(Event::Message(message))) => {
                    let event = RawEvent::new(message.event, message.data);
                    return Some((Ok(event), Some(source)));
                }
                Some(Err(reqwest_eventsource::Error::StreamEnded)) | None => return None,
                Some(Err(e)) => return Some((Err(TransportError::from(e)), None)),
            }
        }
    })
    .boxed()
}

#[async_trait]
impl Transport for RagClient {
    async fn open_stream(
        &self,
        question: &str,
        session_id: &SessionId,
    ) -> Result<RawEventStream, TransportError> {
        let url = self.url(&["rag", "stream"]);
        tracing::debug!(url = %url, session_id = %session_id, "Opening answer stream");

        let request = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&stream_request_body(question, session_id));

        let mut source = EventSource::new(request)
            .map_err(|e| TransportError::protocol(format!("Cannot build stream request: {e}")))?;
        // The stream is a one-shot POST; reconnecting would re-ask the question
        source.set_retry_policy(Box::new(Never));

        Ok(raw_events(source))
    }
}
