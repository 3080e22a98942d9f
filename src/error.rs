//! Crate-wide error type.
//!
//! Component errors ([`FetchError`], [`DocumentError`]) are
//! folded into [`Error`] at the pipeline boundary. The HTTP layer maps each
//! variant to a status code with [`Error::status_code`].
use thiserror::Error;

use crate::feed::{DocumentError, FetchError};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Request body has no `url` field.
    #[error("Request missing url")]
    MissingUrl,

    /// Request body is not a JSON object of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// The feed could not be retrieved: transport failure or a status other than 200.
    #[error("The url could not be requested: {url}: {reason}")]
    Retrieval {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// The retrieved content is not well-formed XML.
    #[error("The requested url's contents could not be parsed: {0}")]
    MalformedDocument(String),

    /// Rendering the response body failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Builds a [`Error::Retrieval`] for `url` from a fetcher failure.
    pub fn retrieval(url: &str, err: FetchError) -> Self {
        Error::Retrieval {
            url: url.to_owned(),
            status: err.status(),
            reason: err.to_string(),
        }
    }

    /// HTTP status used when this error reaches the API boundary.
    ///
    /// Every client-caused failure is a 400; the rest are server faults.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingUrl
            | Error::InvalidRequest(_)
            | Error::Retrieval { .. }
            | Error::MalformedDocument(_) => 400,
            Error::Serialize(_) | Error::Io(_) | Error::Server(_) => 500,
        }
    }

    /// Machine-readable code placed in the JSON error body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingUrl => "missing_url",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Retrieval { .. } => "retrieval_failed",
            Error::MalformedDocument(_) => "malformed_document",
            Error::Serialize(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::Server(_) => "server_error",
        }
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}
