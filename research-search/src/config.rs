//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] picks the engine and controls timeouts, region and
//! request headers. It deserializes from the `[search]` table of the
//! DeepResearch config file.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchEngine;

/// Configuration for a web text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which engine to scrape.
    pub engine: SearchEngine,
    /// Maximum number of raw results to request.
    pub max_results: usize,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to request safe search filtering.
    pub safe_search: bool,
    /// DuckDuckGo-style region code, e.g. `wt-wt` (no region) or `ru-ru`.
    pub region: String,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: SearchEngine::DuckDuckGo,
            max_results: 10,
            timeout_seconds: 8,
            safe_search: true,
            region: "wt-wt".to_owned(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `region` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(SearchError::Config("region must not be empty".into()));
        }
        Ok(())
    }

    /// The `Accept-Language` value matching the configured region.
    pub fn accept_language(&self) -> String {
        match self.region.split_once('-') {
            Some((country, lang)) if country != "wt" && !lang.is_empty() => {
                format!("{lang}-{},{lang};q=0.9,en;q=0.8", country.to_uppercase())
            }
            _ => "en-US,en;q=0.9".to_owned(),
        }
    }
}
