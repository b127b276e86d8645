//! Crawler module for page fetching and link extraction
//!
//! This module contains the network and HTML plumbing used by the rediscovery
//! engine:
//! - HTTP fetching with redirect following and a politeness delay
//! - Anchor extraction, optionally scoped to navigation and footer regions

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use parser::{extract_links, ExtractedLink, LinkScope};
