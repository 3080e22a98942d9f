//! Utility functions shared by the fetcher and the CLI.
//!
//! - **URL validation**: scheme checks plus optional SSRF protection for
//!   user-supplied feed URLs

mod url_validator;

pub use url_validator::{validate_url, UrlValidationError};
