//! Decoding of streamed answer events
//!
//! Each `data` event from the RAG stream carries one JSON object:
//!
//! ```text
//! { "answer"?: { "content": string }, "docs"?: [ { "metadata": { "source": string } } ] }
//! ```

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Structured result of one raw event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamUpdate {
    pub text_fragment: String,
    pub new_sources: Vec<String>,
}

impl StreamUpdate {
    #[allow(dead_code)] // Used in tests
    pub fn new(text_fragment: impl Into<String>, new_sources: Vec<String>) -> Self {
        Self {
            text_fragment: text_fragment.into(),
            new_sources,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_empty(&self) -> bool {
        self.text_fragment.is_empty() && self.new_sources.is_empty()
    }
}

/// Payload could not be decoded; the event must be dropped
#[derive(Debug, Error)]
#[error("malformed stream event: {reason}")]
pub struct MalformedEventError {
    pub reason: String,
}

impl MalformedEventError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    answer: Option<AnswerChunk>,
    #[serde(default)]
    docs: Option<Vec<SourceDocument>>,
}

#[derive(Debug, Deserialize)]
struct AnswerChunk {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourceDocument {
    metadata: DocumentMetadata,
}

#[derive(Debug, Deserialize)]
struct DocumentMetadata {
    source: String,
}

/// Decode one raw event payload. Pure; never partially applies.
pub fn decode(raw: &str) -> Result<StreamUpdate, MalformedEventError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| MalformedEventError::new(e.to_string()))?;
    if !value.is_object() {
        return Err(MalformedEventError::new("payload is not a JSON object"));
    }
    let payload: EventPayload =
        serde_json::from_value(value).map_err(|e| MalformedEventError::new(e.to_string()))?;

    let text_fragment = payload
        .answer
        .and_then(|answer| answer.content)
        .unwrap_or_default();
    let new_sources = payload
        .docs
        .unwrap_or_default()
        .into_iter()
        .map(|doc| doc.metadata.source)
        .collect();

    Ok(StreamUpdate {
        text_fragment,
        new_sources,
    })
}
