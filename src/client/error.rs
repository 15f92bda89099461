//! Client error types

use super::AuthAction;
use std::path::PathBuf;
use thiserror::Error;

/// Stream open/interrupt failure, terminal for one stream attempt
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Protocol, message)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => TransportErrorKind::Auth,
            500..=599 => TransportErrorKind::ServerError,
            _ => TransportErrorKind::InvalidRequest,
        };
        Self::new(kind, format!("RAG service returned {status}"))
    }
}

impl From<reqwest_eventsource::Error> for TransportError {
    fn from(err: reqwest_eventsource::Error) -> Self {
        use reqwest_eventsource::Error;
        match err {
            Error::InvalidStatusCode(status, _) => Self::from_status(status),
            Error::InvalidContentType(content_type, _) => Self::protocol(format!(
                "Expected an event stream, got content type {content_type:?}"
            )),
            Error::Transport(e) => Self::network(format!("Stream transport failed: {e}")),
            Error::StreamEnded => Self::network("Stream ended unexpectedly"),
            other => Self::protocol(format!("Invalid event stream: {other}")),
        }
    }
}

/// Error classification for stream failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection failures, resets, timeouts
    Network,
    /// Authentication failed (401, 403)
    Auth,
    /// Server error (5xx)
    ServerError,
    /// Other rejected requests (4xx)
    InvalidRequest,
    /// Response was not a well-formed event stream
    Protocol,
}

/// Login or registration failure
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{action} failed. Please check your username and password. (status {status})")]
    Rejected {
        action: AuthAction,
        status: reqwest::StatusCode,
    },
    #[error("An error occurred during {action}: {source}")]
    Request {
        action: AuthAction,
        #[source]
        source: reqwest::Error,
    },
}

/// Upload or ingest failure
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No files selected")]
    NoFiles,
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server rejected the request ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to load and process PDFs: {0}")]
    IngestFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            TransportError::from_status(StatusCode::UNAUTHORIZED).kind,
            TransportErrorKind::Auth
        );
        assert_eq!(
            TransportError::from_status(StatusCode::BAD_GATEWAY).kind,
            TransportErrorKind::ServerError
        );
        assert_eq!(
            TransportError::from_status(StatusCode::UNPROCESSABLE_ENTITY).kind,
            TransportErrorKind::InvalidRequest
        );
    }

    #[test]
    fn test_stream_ended_is_network() {
        let err = TransportError::from(reqwest_eventsource::Error::StreamEnded);
        assert_eq!(err.kind, TransportErrorKind::Network);
    }
}
