//! Feed retrieval and parsing pipeline.
//!
//! A feed URL goes through four stages, each in its own submodule:
//!
//! - [`fetcher`] - one HTTP GET, status must be 200
//! - [`document`] - XML parsing and lookup of the `<channel>` element
//! - [`parser`] - `<item>` elements to [`Item`]s, delegating descriptions to [`description`]
//! - [`serialize`] - dictionary and legacy text renderings of the result
//!
//! # Example
//!
//! ```ignore
//! use feed_reader::feed::{read_feed, to_text, Fetcher};
//!
//! let fetcher = Fetcher::new(&config.fetch)?;
//! let feed = read_feed(&fetcher, "https://example.com/rss.xml").await?;
//! println!("{}", to_text(&feed)?);
//! ```

pub mod description;
pub mod document;
pub mod fetcher;
pub mod model;
pub mod parser;
pub mod serialize;

pub use description::decompose;
pub use document::{locate_items_root, parse_document, DocumentError, XmlDocument, XmlElement};
pub use fetcher::{FetchError, Fetcher};
pub use model::{DescriptionBlock, Feed, Item};
pub use parser::{parse_feed, parse_item};
pub use serialize::{to_dict, to_text};

use crate::error::{Error, Result};

/// Parses a raw feed document into a [`Feed`].
///
/// A well-formed document without a `<channel>` yields an empty feed.
pub fn parse_feed_bytes(bytes: &[u8]) -> Result<Feed, DocumentError> {
    let items_root = locate_items_root(bytes)?;
    Ok(parse_feed(items_root.as_ref()))
}

/// Runs the whole pipeline for `url`: fetch, parse, decompose.
///
/// # Errors
///
/// - [`Error::Retrieval`] - the document could not be fetched
/// - [`Error::MalformedDocument`] - the document is not well-formed XML
pub async fn read_feed(fetcher: &Fetcher, url: &str) -> Result<Feed> {
    let bytes = fetcher.fetch(url).await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Feed retrieval failed");
        Error::retrieval(url, e)
    })?;

    let feed = parse_feed_bytes(&bytes).map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Feed document could not be parsed");
        Error::from(e)
    })?;

    tracing::info!(url = %url, items = feed.len(), "Read feed");
    Ok(feed)
}
