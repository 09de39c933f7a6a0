//! Error types for the research pipeline.
//!
//! None of these cross a pipeline boundary as an `Err`: each stage maps
//! its failures to a fixed fallback value. The variants exist so the
//! degraded paths can be told apart in logs and tests.

/// Top-level error type for the research pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Query rejected before any work was done.
    #[error("validation error: {0}")]
    Validation(String),

    /// The search provider failed (network, timeout, malformed response).
    #[error("search provider error: {0}")]
    Provider(#[from] research_search::SearchError),

    /// The summarization capability could not be initialized.
    #[error("summarization model unavailable: {0}")]
    ModelUnavailable(String),

    /// The summarization capability failed during a call.
    #[error("summarization error: {0}")]
    Summarization(String),

    /// Anything else, e.g. a panic inside a stage or a rendering failure.
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ResearchError>;
