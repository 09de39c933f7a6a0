//! Result acquisition and normalization.
//!
//! One search call per query, then a single pass over the raw records in
//! provider order: drop malformed and duplicate records, truncate fields,
//! stop at [`MAX_DOCUMENTS`]. Provider failures degrade to an empty list.

use std::collections::HashSet;

use research_search::{RawResult, SearchProvider};

use crate::document::{Document, MAX_DOCUMENTS};
use crate::error::{ResearchError, Result};

/// Queries shorter than this (after trimming) are rejected.
pub const MIN_QUERY_CHARS: usize = 3;
/// Raw results requested from the provider per query.
pub const SEARCH_MAX_RESULTS: usize = 10;

/// Returns `true` if `query` has at least [`MIN_QUERY_CHARS`] characters after trimming.
pub fn is_valid_query(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Fetches and normalizes search results.
#[derive(Debug, Clone)]
pub struct Retriever<P> {
    provider: P,
}

impl<P: SearchProvider> Retriever<P> {
    /// Create a retriever over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying search provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Documents for `query`; empty when the query is too short, nothing
    /// was found, or the search failed.
    pub async fn fetch(&self, query: &str) -> Vec<Document> {
        match self.try_fetch(query).await {
            Ok(documents) => documents,
            Err(ResearchError::Validation(reason)) => {
                tracing::debug!(%reason, "query rejected before search");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed, continuing with no results");
                Vec::new()
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but reports why nothing came back.
    ///
    /// # Errors
    ///
    /// [`ResearchError::Validation`] for a short query (the provider is not
    /// contacted), [`ResearchError::Provider`] if the search call fails.
    pub async fn try_fetch(&self, query: &str) -> Result<Vec<Document>> {
        let query = query.trim();
        if !is_valid_query(query) {
            return Err(ResearchError::Validation(format!(
                "query must contain at least {MIN_QUERY_CHARS} characters"
            )));
        }

        tracing::trace!(query, "searching");
        let raw = self
            .provider
            .text_search(query, SEARCH_MAX_RESULTS)
            .await?;
        let documents = normalize_results(&raw);
        tracing::debug!(
            raw = raw.len(),
            kept = documents.len(),
            "search results normalized"
        );
        Ok(documents)
    }
}

/// Normalize raw records in provider order.
///
/// Non-objects, records without a url or title, and repeated urls (exact,
/// case-sensitive match; first wins) are skipped. At most
/// [`MAX_DOCUMENTS`] documents are returned.
pub fn normalize_results(raw: &[RawResult]) -> Vec<Document> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut documents = Vec::with_capacity(MAX_DOCUMENTS);

    for record in raw {
        if documents.len() >= MAX_DOCUMENTS {
            break;
        }
        let Some(document) = Document::from_raw(record) else {
            continue;
        };
        if !seen.insert(document.url.clone()) {
            continue;
        }
        documents.push(document);
    }

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_search::SearchError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns canned records, or fails, and counts calls.
    struct CannedProvider {
        records: Option<Vec<RawResult>>,
        calls: AtomicUsize,
        requested: AtomicUsize,
    }

    impl CannedProvider {
        fn returning(records: Vec<RawResult>) -> Self {
            Self {
                records: Some(records),
                calls: AtomicUsize::new(0),
                requested: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                records: None,
                calls: AtomicUsize::new(0),
                requested: AtomicUsize::new(0),
            }
        }
    }

    impl SearchProvider for CannedProvider {
        async fn text_search(
            &self,
            _query: &str,
            max_results: usize,
        ) -> std::result::Result<Vec<RawResult>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.store(max_results, Ordering::SeqCst);
            self.records
                .clone()
                .ok_or_else(|| SearchError::Timeout("DuckDuckGo did not respond in time".into()))
        }
    }

    fn record(title: &str, href: &str) -> RawResult {
        json!({"title": title, "href": href, "body": format!("About {title}")})
    }

    fn numbered(i: usize) -> RawResult {
        record(&format!("T{i}"), &format!("https://e.example/{i}"))
    }

    #[test]
    fn query_length_is_measured_after_trimming() {
        assert!(!is_valid_query(""));
        assert!(!is_valid_query("a"));
        assert!(!is_valid_query("ab"));
        assert!(!is_valid_query("  ab  "));
        assert!(is_valid_query("abc"));
        assert!(is_valid_query("ёжи"));
    }

    #[test]
    fn normalize_dedups_first_wins() {
        let raw = vec![
            record("First", "https://a.example"),
            record("Second", "https://a.example"),
            record("Third", "https://b.example"),
        ];
        let docs = normalize_results(&raw);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "First");
        assert_eq!(docs[1].title, "Third");
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let raw = vec![
            record("Lower", "https://a.example/page"),
            record("Upper", "https://a.example/PAGE"),
        ];
        assert_eq!(normalize_results(&raw).len(), 2);
    }

    #[test]
    fn normalize_caps_at_five_in_provider_order() {
        let raw: Vec<_> = (0..10).map(numbered).collect();
        let docs = normalize_results(&raw);
        assert_eq!(docs.len(), MAX_DOCUMENTS);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["T0", "T1", "T2", "T3", "T4"]);
    }

    #[test]
    fn invalid_records_do_not_count_towards_cap() {
        let mut raw = vec![json!("junk"), json!({"title": "no url"}), json!(42)];
        raw.extend((0..5).map(numbered));
        assert_eq!(normalize_results(&raw).len(), 5);
    }

    #[test]
    fn records_without_href_or_url_are_excluded() {
        let raw = vec![
            json!({"title": "Missing", "body": "text", "link": "https://x.example"}),
            record("Kept", "https://k.example"),
        ];
        let docs = normalize_results(&raw);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://k.example");
    }

    #[test]
    fn urls_unique_for_arbitrary_batches() {
        let urls = ["u1", "u2", "u1", "u3", "u2", "u4", "u5", "u6", "u1"];
        let raw: Vec<_> = urls.iter().map(|u| record("T", u)).collect();
        let docs = normalize_results(&raw);
        let unique: HashSet<_> = docs.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(unique.len(), docs.len());
        assert!(docs.len() <= MAX_DOCUMENTS);
    }

    #[tokio::test]
    async fn short_query_never_contacts_provider() {
        let retriever = Retriever::new(CannedProvider::returning(vec![]));
        for query in ["", "a", "ab", "   ab "] {
            assert!(retriever.fetch(query).await.is_empty());
            assert!(matches!(
                retriever.try_fetch(query).await,
                Err(ResearchError::Validation(_))
            ));
        }
        assert_eq!(retriever.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_requests_ten_results_once() {
        let retriever = Retriever::new(CannedProvider::returning(vec![record(
            "Rust",
            "https://www.rust-lang.org/",
        )]));
        let docs = retriever.fetch("  rust language ").await;
        assert_eq!(docs.len(), 1);
        assert_eq!(retriever.provider().calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            retriever.provider().requested.load(Ordering::SeqCst),
            SEARCH_MAX_RESULTS
        );
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty() {
        let retriever = Retriever::new(CannedProvider::failing());
        assert!(retriever.fetch("rust language").await.is_empty());
        assert!(matches!(
            retriever.try_fetch("rust language").await,
            Err(ResearchError::Provider(SearchError::Timeout(_)))
        ));
    }
}
