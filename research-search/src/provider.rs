//! The text-search capability consumed by the research pipeline.
//!
//! [`SearchProvider`] is the seam between the pipeline and whatever
//! produces raw records. [`WebSearch`] is the production implementation;
//! tests substitute their own.

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::engines::{BingEngine, DuckDuckGoEngine};
use crate::error::SearchError;
use crate::types::{RawResult, SearchEngine};

/// A black-box text search service.
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, returning at most `max_results` raw records in
    /// provider order.
    ///
    /// # Errors
    ///
    /// Any transport, timeout or parse failure.
    fn text_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RawResult>, SearchError>> + Send;
}

/// Web search backed by the engine named in [`SearchConfig::engine`].
#[derive(Debug, Clone, Default)]
pub struct WebSearch {
    config: SearchConfig,
}

impl WebSearch {
    /// Create a provider after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the provider's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The configuration for one request of `max_results` records.
    ///
    /// The request cannot raise the configured `max_results`; every other
    /// field is the provider's own.
    pub fn effective_config(&self, max_results: usize) -> SearchConfig {
        SearchConfig {
            max_results: max_results.min(self.config.max_results),
            ..self.config.clone()
        }
    }
}

impl SearchProvider for WebSearch {
    async fn text_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawResult>, SearchError> {
        let config = self.effective_config(max_results);
        config.validate()?;

        let results = match config.engine {
            SearchEngine::DuckDuckGo => DuckDuckGoEngine.search(query, &config).await?,
            SearchEngine::Bing => BingEngine.search(query, &config).await?,
        };
        tracing::debug!(engine = %config.engine, count = results.len(), "text search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = WebSearch::new(config).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn new_keeps_config() {
        let config = SearchConfig {
            engine: SearchEngine::Bing,
            ..Default::default()
        };
        let provider = WebSearch::new(config).expect("valid config");
        assert_eq!(provider.config().engine, SearchEngine::Bing);
    }

    #[test]
    fn request_above_configured_limit_is_clamped() {
        let provider = WebSearch::new(SearchConfig {
            max_results: 5,
            ..Default::default()
        })
        .expect("valid config");
        assert_eq!(provider.effective_config(50).max_results, 5);
        assert_eq!(provider.effective_config(5).max_results, 5);
    }

    #[test]
    fn smaller_request_is_kept() {
        let provider = WebSearch::default();
        assert_eq!(provider.effective_config(3).max_results, 3);
        assert_eq!(provider.effective_config(0).max_results, 0);
    }

    #[test]
    fn effective_config_keeps_other_fields() {
        let config = SearchConfig {
            engine: SearchEngine::Bing,
            region: "de-de".into(),
            safe_search: false,
            timeout_seconds: 4,
            max_results: 10,
            user_agent: Some("deepresearch-test".into()),
        };
        let provider = WebSearch::new(config.clone()).expect("valid config");
        let effective = provider.effective_config(7);
        assert_eq!(
            effective,
            SearchConfig {
                max_results: 7,
                ..config
            }
        );
    }

    #[tokio::test]
    async fn zero_max_results_is_a_config_error() {
        let provider = WebSearch::default();
        let err = provider.text_search("rust", 0).await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebSearch>();
    }

    #[tokio::test]
    #[ignore] // Live test, run with `cargo test -- --ignored`
    async fn live_text_search() {
        let provider = WebSearch::default();
        let results = provider
            .text_search("rust programming", 10)
            .await
            .expect("live search should work");
        assert!(!results.is_empty());
        assert!(results.len() <= 10);
    }
}
