//! Shared state for API handlers.

use crate::feed::Fetcher;
use crate::{Config, Error, Result};

/// State handed to every handler.
///
/// Holds no per-request data; each request builds its feed from scratch.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher =
            Fetcher::new(&config.fetch).map_err(|e| Error::Server(format!("HTTP client: {e}")))?;
        Ok(Self { fetcher })
    }
}
