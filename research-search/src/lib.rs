//! # research-search
//!
//! Keyless web text search for DeepResearch.
//!
//! This crate scrapes a public search engine's HTML results page and
//! returns the hits as raw, unvalidated records. No API keys, no
//! external services. Normalisation and deduplication belong to the
//! consumer.
//!
//! ## Design
//!
//! - One engine per search (DuckDuckGo by default, Bing as an alternative)
//! - Records are JSON objects in page order; keys differ by engine
//! - The HTTP client lives for exactly one search
//! - Queries are logged only at trace level

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod provider;
pub mod types;

pub use config::SearchConfig;
pub use engine::SearchEngineTrait;
pub use error::{Result, SearchError};
pub use provider::{SearchProvider, WebSearch};
pub use types::{raw_record, RawResult, SearchEngine};

/// Search the web with the engine named in `config`.
///
/// Returns up to `config.max_results` raw records in page order.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, or the
/// engine's transport/parse error.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> research_search::Result<()> {
/// let config = research_search::SearchConfig::default();
/// let records = research_search::search("rust programming", &config).await?;
/// for record in &records {
///     println!("{}", record["title"]);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<RawResult>> {
    let provider = WebSearch::new(config.clone())?;
    provider.text_search(query, config.max_results).await
}
