//! Client configuration

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

/// Configuration for talking to the RAG service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: parse_server_url(server_url)?,
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            std::env::var("RAG_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let connect_timeout = std::env::var("RAG_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let mut config = Self::new(&server_url)?;
        config.username = std::env::var("RAG_USERNAME").ok();
        config.password = std::env::var("RAG_PASSWORD").ok();
        config.connect_timeout = Duration::from_secs(connect_timeout);
        Ok(config)
    }

    pub fn with_server_url(mut self, server_url: &str) -> Result<Self, ConfigError> {
        self.server_url = parse_server_url(server_url)?;
        Ok(self)
    }

    /// Username and password, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }
}

fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidServerUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) base URL".to_string()));
    }
    Ok(url)
}

/// Build `{base}/{segments...}`, percent-encoding each segment
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
