//! The summarization capability and its process-wide handle.
//!
//! A [`Summarizer`] reduces text to a summary whose length in words lies
//! within caller-supplied bounds, deterministically. The model behind it
//! is expensive to set up, so it is loaded once into a
//! [`SummarizerHandle`] at startup and shared read-only afterwards. If the
//! load fails the handle records why, and every later call sees the same
//! cached unavailability instead of retrying.

pub mod extractive;
pub mod openai;
pub mod probe;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{SummarizerBackend, SummarizerConfig};
use crate::error::{ResearchError, Result};

pub use extractive::ExtractiveSummarizer;
pub use openai::{OpenAiSummarizer, OpenAiSummarizerConfig};
pub use probe::{EndpointProbe, ProbeStatus};

/// A deterministic text-to-text reducer.
///
/// Implementations must tolerate concurrent calls through a shared
/// reference.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Summarize `text` into at most `max_length` and, where the input
    /// allows, at least `min_length` words.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Summarization`] when the call fails.
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String>;
}

/// The loaded summarization model, or the reason it could not be loaded.
#[derive(Clone)]
pub enum SummarizerHandle {
    /// The model is ready for use.
    Ready(Arc<dyn Summarizer>),
    /// Initialization failed; the reason is kept for logs.
    Unavailable(String),
}

impl SummarizerHandle {
    /// Load the configured backend once.
    ///
    /// For an OpenAI-compatible endpoint this probes the endpoint and
    /// checks that the model is served. Any failure yields
    /// [`SummarizerHandle::Unavailable`]; this never returns an error.
    pub async fn initialize(config: &SummarizerConfig) -> Self {
        let handle = match config.backend {
            SummarizerBackend::Extractive => Self::ready(ExtractiveSummarizer),
            SummarizerBackend::OpenaiCompatible => Self::initialize_endpoint(config).await,
        };
        match &handle {
            Self::Ready(summarizer) => {
                tracing::info!(backend = summarizer.name(), "summarization model loaded");
            }
            Self::Unavailable(reason) => {
                tracing::error!(%reason, "summarization model unavailable");
            }
        }
        handle
    }

    async fn initialize_endpoint(config: &SummarizerConfig) -> Self {
        let probe = EndpointProbe::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.probe_timeout_secs),
        );
        let status = probe.probe().await;
        tracing::debug!(endpoint = %config.base_url, %status, "summarizer endpoint probed");

        if !status.is_available() {
            return Self::Unavailable(format!("{} is {status}", config.base_url));
        }
        if !status.serves(&config.model) {
            return Self::Unavailable(format!(
                "model {} is not served by {}",
                config.model, config.base_url
            ));
        }

        let mut endpoint = OpenAiSummarizerConfig::new(&config.base_url, &config.model)
            .with_timeout(Duration::from_secs(config.timeout_secs));
        if let Some(key) = &config.api_key {
            endpoint = endpoint.with_api_key(key);
        }
        match OpenAiSummarizer::new(endpoint) {
            Ok(summarizer) => Self::ready(summarizer),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }

    /// Wrap an already-built summarizer.
    pub fn ready(summarizer: impl Summarizer + 'static) -> Self {
        Self::Ready(Arc::new(summarizer))
    }

    /// A handle that reports `reason` on every use.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Returns `true` if a model is loaded.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::ModelUnavailable`] with the cached reason.
    pub fn get(&self) -> Result<&Arc<dyn Summarizer>> {
        match self {
            Self::Ready(summarizer) => Ok(summarizer),
            Self::Unavailable(reason) => Err(ResearchError::ModelUnavailable(reason.clone())),
        }
    }
}

impl fmt::Debug for SummarizerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(summarizer) => f.debug_tuple("Ready").field(&summarizer.name()).finish(),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Keep at most `max` whitespace-delimited words.
///
/// Text within the limit is returned unchanged; longer text is rejoined
/// with single spaces.
pub fn truncate_words(text: &str, max: usize) -> String {
    if text.split_whitespace().count() <= max {
        return text.to_owned();
    }
    text.split_whitespace()
        .take(max)
        .collect::<Vec<_>>()
        .join(" ")
}
