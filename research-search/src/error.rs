//! Error types for the research-search crate.
//!
//! Messages are stable and safe to show to users. Query text never
//! appears in an error message.

/// Errors that can occur while talking to a search engine.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The engine did not answer within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a search engine failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The engine answered with something that could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a transport error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(engine: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{engine} did not respond in time"))
        } else {
            Self::Http(format!("{engine} request failed: {err}"))
        }
    }
}

/// Convenience type alias for research-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
