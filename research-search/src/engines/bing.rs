//! Bing search engine, an alternative index for when DuckDuckGo is blocked.
//!
//! Records carry the keys `title`, `url` and `description`.

use scraper::{ElementRef, Html, Selector};

use super::{element_text, first_text, selector};
use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{raw_record, RawResult, SearchEngine};

const ENDPOINT: &str = "https://www.bing.com/search";

/// Bing HTML search scraper.
pub struct BingEngine;

impl SearchEngineTrait for BingEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, "Bing search");

        let mut params = vec![
            ("q", query.to_owned()),
            ("safeSearch", safe_search_level(config.safe_search).to_owned()),
            ("count", config.max_results.to_string()),
        ];
        if let Some(market) = market(&config.region) {
            params.push(("mkt", market));
        }

        let client = http::build_client(config)?;
        let request = client
            .get(ENDPOINT)
            .query(&params)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml");
        let html = http::fetch_html(request, "Bing").await?;

        parse_bing_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Bing
    }
}

fn safe_search_level(enabled: bool) -> &'static str {
    if enabled { "Strict" } else { "Off" }
}

/// Bing market for a region code (`us-en` → `en-US`); `wt-wt` has none.
fn market(region: &str) -> Option<String> {
    let (country, lang) = region.split_once('-')?;
    if country == "wt" || country.is_empty() || lang.is_empty() {
        return None;
    }
    Some(format!("{lang}-{}", country.to_uppercase()))
}

/// Organic result (`li.b_algo`) selectors.
struct AlgoSelectors {
    item: Selector,
    heading: Selector,
    anchor: Selector,
    caption: Selector,
}

impl AlgoSelectors {
    fn compile() -> Result<Self, SearchError> {
        Ok(Self {
            item: selector("li.b_algo")?,
            heading: selector("h2")?,
            anchor: selector("a[href]")?,
            caption: selector(".b_caption p, .b_lineclamp2")?,
        })
    }

    /// One result as a raw record; `None` without a heading.
    fn record(&self, item: ElementRef<'_>) -> Option<RawResult> {
        let heading = item.select(&self.heading).next()?;
        let url = heading
            .select(&self.anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        Some(raw_record(&[
            ("title", &element_text(heading)),
            ("url", url),
            ("description", &first_text(item, &self.caption)),
        ]))
    }
}

/// Parse a Bing results page into at most `max_results` records.
fn parse_bing_html(html: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
    let selectors = AlgoSelectors::compile()?;
    let page = Html::parse_document(html);

    let records: Vec<RawResult> = page
        .select(&selectors.item)
        .filter_map(|item| selectors.record(item))
        .take(max_results)
        .collect();

    tracing::debug!(count = records.len(), "Bing results parsed");
    Ok(records)
}
