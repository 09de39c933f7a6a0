//! DuckDuckGo search engine, the default.
//!
//! Posts the query to the JavaScript-free endpoint at
//! `https://html.duckduckgo.com/html/` and scrapes the result cards.
//! Records carry the keys `title`, `href` and `body`. Ads are skipped and
//! redirect links are unwrapped to their target.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{element_text, first_text, selector};
use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{raw_record, RawResult, SearchEngine};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const ORGANIC_RESULTS: &str =
    ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)";

/// DuckDuckGo HTML search engine scraper.
pub struct DuckDuckGoEngine;

impl SearchEngineTrait for DuckDuckGoEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let mut form = vec![("q", query), ("kl", config.region.as_str())];
        if config.safe_search {
            form.push(("kp", "1"));
        }

        // The client is dropped with this frame, on success and on error.
        let client = http::build_client(config)?;
        let html = http::fetch_html(client.post(ENDPOINT).form(&form), "DuckDuckGo").await?;

        parse_duckduckgo_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }
}

/// Result card selectors, compiled once per page.
struct CardSelectors {
    card: Selector,
    link: Selector,
    snippet: Selector,
}

impl CardSelectors {
    fn compile() -> Result<Self, SearchError> {
        Ok(Self {
            card: selector(ORGANIC_RESULTS)?,
            link: selector(".result__a")?,
            snippet: selector(".result__snippet")?,
        })
    }

    /// One card as a raw record; `None` if the card has no title link.
    fn record(&self, card: ElementRef<'_>) -> Option<RawResult> {
        let link = card.select(&self.link).next()?;
        let href = link
            .value()
            .attr("href")
            .and_then(unwrap_redirect)
            .unwrap_or_default();
        Some(raw_record(&[
            ("title", &element_text(link)),
            ("href", &href),
            ("body", &first_text(card, &self.snippet)),
        ]))
    }
}

/// Parse a DuckDuckGo results page into at most `max_results` records.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawResult>, SearchError> {
    let selectors = CardSelectors::compile()?;
    let page = Html::parse_document(html);

    let records: Vec<RawResult> = page
        .select(&selectors.card)
        .filter_map(|card| selectors.record(card))
        .take(max_results)
        .collect();

    tracing::debug!(count = records.len(), "DuckDuckGo results parsed");
    Ok(records)
}

/// Resolve a result link to its target.
///
/// Links look like `//duckduckgo.com/l/?uddg=<percent-encoded target>&rut=...`;
/// anything else is returned as an absolute url. Unparseable links give `None`.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_owned(),
    };
    let parsed = Url::parse(&absolute).ok()?;

    let is_redirect =
        parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/");
    if !is_redirect {
        return Some(absolute);
    }
    parsed
        .query_pairs()
        .find_map(|(key, value)| (key == "uddg").then(|| value.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftokio.rs%2F&amp;rut=abc123">
        Tokio - An asynchronous Rust runtime
    </a>
    <div class="result__snippet">
        Tokio is an   event-driven, non-blocking I/O platform.
    </div>
</div>
<div class="result results_links results_links_deep web-result result--ad">
    <a class="result__a" href="https://ads.example.com/">Sponsored runtime</a>
    <div class="result__snippet">Buy now.</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://docs.rs/tokio/latest/tokio/">
        tokio — docs.rs
    </a>
</div>
<div class="result results_links results_links_deep web-result">
    <span>card without a title link</span>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fgithub.com%2Ftokio-rs%2Ftokio&amp;rut=def456">
        GitHub - tokio-rs/tokio
    </a>
    <div class="result__snippet">A runtime for writing reliable asynchronous applications.</div>
</div>
</body>
</html>"#;

    #[test]
    fn redirect_is_unwrapped() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1&rut=x"),
            Some("https://example.com/a?b=1".to_owned())
        );
    }

    #[test]
    fn direct_and_protocol_relative_links_pass_through() {
        assert_eq!(
            unwrap_redirect("https://example.com/direct"),
            Some("https://example.com/direct".to_owned())
        );
        assert_eq!(
            unwrap_redirect("//example.com/page"),
            Some("https://example.com/page".to_owned())
        );
    }

    #[test]
    fn unparseable_link_is_dropped() {
        assert_eq!(unwrap_redirect("not-a-url"), None);
    }

    #[test]
    fn page_order_is_kept_and_ads_skipped() {
        let records = parse_duckduckgo_html(RESULTS_PAGE, 10).expect("should parse");
        let hrefs: Vec<_> = records
            .iter()
            .map(|r| r["href"].as_str().unwrap_or(""))
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "https://tokio.rs/",
                "https://docs.rs/tokio/latest/tokio/",
                "https://github.com/tokio-rs/tokio",
            ]
        );
        assert!(records.iter().all(|r| r["title"] != "Sponsored runtime"));
    }

    #[test]
    fn text_is_collapsed() {
        let records = parse_duckduckgo_html(RESULTS_PAGE, 10).expect("should parse");
        assert_eq!(records[0]["title"], "Tokio - An asynchronous Rust runtime");
        assert_eq!(
            records[0]["body"],
            "Tokio is an event-driven, non-blocking I/O platform."
        );
    }

    #[test]
    fn missing_snippet_leaves_body_absent() {
        let records = parse_duckduckgo_html(RESULTS_PAGE, 10).expect("should parse");
        assert!(records[1].get("body").is_none());
    }

    #[test]
    fn cards_without_title_do_not_count_towards_limit() {
        let records = parse_duckduckgo_html(RESULTS_PAGE, 3).expect("should parse");
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["href"], "https://github.com/tokio-rs/tokio");
    }

    #[test]
    fn empty_page_yields_nothing() {
        let records = parse_duckduckgo_html("<html><body></body></html>", 10).expect("parse");
        assert!(records.is_empty());
    }

    #[test]
    fn engine_type_is_duckduckgo() {
        assert_eq!(DuckDuckGoEngine.engine_type(), SearchEngine::DuckDuckGo);
    }

    #[tokio::test]
    #[ignore] // Live test, run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let records = DuckDuckGoEngine
            .search("tokio runtime", &SearchConfig::default())
            .await
            .expect("live search should work");
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.get("title").is_some()));
    }
}
