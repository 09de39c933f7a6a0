//! Search engine implementations.
//!
//! Each module scrapes one engine's HTML results page into raw records.

pub mod bing;
pub mod duckduckgo;

pub use bing::BingEngine;
pub use duckduckgo::DuckDuckGoEngine;

use scraper::{ElementRef, Selector};

use crate::error::SearchError;

/// Compile a CSS selector, reporting which one was malformed.
pub(crate) fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Visible text of `element` with whitespace runs collapsed to one space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match of `sel` under `element`, or an empty string.
pub(crate) fn first_text(element: ElementRef<'_>, sel: &Selector) -> String {
    element
        .select(sel)
        .next()
        .map(element_text)
        .unwrap_or_default()
}
