//! Raw result records and engine identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An unvalidated record as returned by a search engine.
///
/// Records are JSON objects whose keys vary by engine: the url may sit
/// under `href` or `url`, the body text under `body`, `description` or
/// `content`. Consumers must also tolerate values that are not objects.
pub type RawResult = serde_json::Value;

/// Build a raw record object from key/value pairs.
///
/// Empty values are omitted so that consumers see them as absent.
pub fn raw_record(fields: &[(&str, &str)]) -> RawResult {
    let map = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| ((*key).to_owned(), RawResult::String((*value).to_owned())))
        .collect::<serde_json::Map<_, _>>();
    RawResult::Object(map)
}

/// Search engines that research-search can scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// DuckDuckGo HTML endpoint, no JavaScript required.
    #[default]
    DuckDuckGo,
    /// Bing, a different index for when DuckDuckGo is blocked.
    Bing,
}

impl SearchEngine {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Bing => "Bing",
        }
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::DuckDuckGo, Self::Bing]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
