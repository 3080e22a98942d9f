use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::util::{validate_url, UrlValidationError};

/// Errors that can occur while retrieving a feed document.
///
/// Every variant is a retrieval failure from the client's point of view;
/// [`FetchError::status`] exposes the HTTP status when one was received.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL failed validation (unparseable, bad scheme, private host)
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Response status was not 200 OK
    #[error("The requested feed could not be retrieved. Code: {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

impl FetchError {
    /// HTTP status observed before failing, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus(code) => Some(*code),
            FetchError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Retrieves raw feed documents over HTTP.
///
/// One GET per call, no retries. Cloning is cheap: the underlying
/// `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_size: usize,
    allow_private_hosts: bool,
}

impl Fetcher {
    /// Builds a fetcher with its own HTTP client configured from `config`.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a caller-provided client (tests, shared connection pools).
    pub fn with_client(client: reqwest::Client, config: &FetchConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_size: config.max_feed_size,
            allow_private_hosts: config.allow_private_hosts,
        }
    }

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] - URL rejected before any request was made
    /// - [`FetchError::Network`] - Connection, DNS or TLS errors
    /// - [`FetchError::Timeout`] - No complete response within the timeout
    /// - [`FetchError::HttpStatus`] - Any status other than 200
    /// - [`FetchError::ResponseTooLarge`] - Body exceeded the size limit
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let validated = validate_url(url, self.allow_private_hosts)?;

        let response = tokio::time::timeout(self.timeout, self.client.get(validated).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(
                url = %url,
                status = %response.status(),
                "Feed request returned non-200 status"
            );
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = tokio::time::timeout(self.timeout, read_limited_bytes(response, self.max_size))
            .await
            .map_err(|_| FetchError::Timeout)??;

        tracing::debug!(url = %url, bytes = bytes.len(), "Fetched feed");
        Ok(bytes)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
