//! Reads an RSS feed and returns its items with structured descriptions.
//!
//! The library exposes the pipeline ([`feed`]), the HTTP surface ([`api`])
//! and the service configuration ([`config`]). The `feed-reader` binary wires
//! them together.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod util;

pub use config::Config;
pub use error::{Error, Result};
