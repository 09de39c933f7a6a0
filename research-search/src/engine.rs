//! Trait definition for pluggable search engine backends.
//!
//! Each engine (DuckDuckGo, Bing) implements [`SearchEngineTrait`] to
//! turn a query into raw result records.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{RawResult, SearchEngine};

/// A pluggable search engine backend.
///
/// Implementors scrape one engine's HTML response and emit raw records
/// in page order. Each engine handles its own:
///
/// - URL construction with query encoding
/// - HTTP request with appropriate headers
/// - HTML parsing via CSS selectors
///
/// Records are not validated or deduplicated here; that is the
/// consumer's job. All implementations must be `Send + Sync`.
pub trait SearchEngineTrait: Send + Sync {
    /// Perform a web search and return raw records, at most
    /// `config.max_results` of them.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, times out, or
    /// the response cannot be parsed.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<RawResult>, SearchError>> + Send;

    /// Returns which [`SearchEngine`] variant this implementation represents.
    fn engine_type(&self) -> SearchEngine;
}
