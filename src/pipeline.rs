//! Request sequencing: validate, retrieve, synthesize, render.
//!
//! One query runs exactly one retrieval followed by exactly one synthesis.
//! Nothing inside a stage can make [`ResearchPipeline::run`] fail: degraded
//! stages produce fallback text, and a panic inside a stage is caught at
//! this boundary and reported as an error message.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use research_search::SearchProvider;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ResearchError;
use crate::render::render_links;
use crate::retriever::{Retriever, is_valid_query};
use crate::synthesizer::{EMPTY_OUTCOME_MARKER, Link, ResearchOutcome, Synthesis, Synthesizer};

/// Returned in place of a summary when the query is too short.
pub const VALIDATION_MESSAGE: &str = "Query must contain at least 3 characters.";

/// Prefix of the summary when a stage failed unexpectedly.
pub const UNEXPECTED_ERROR_PREFIX: &str = "Error while processing the query";

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStage {
    Start,
    Searching,
    NoResults,
    SearchFailed,
    Synthesizing,
    Summarized,
    SummarizationSkipped,
    SummarizationFailed,
    Done,
}

impl ResearchStage {
    /// Stable lowercase name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Searching => "searching",
            Self::NoResults => "no_results",
            Self::SearchFailed => "search_failed",
            Self::Synthesizing => "synthesizing",
            Self::Summarized => "summarized",
            Self::SummarizationSkipped => "summarization_skipped",
            Self::SummarizationFailed => "summarization_failed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ResearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped record threaded between stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchState {
    pub query: String,
    pub results: Vec<Document>,
    pub summary: Option<String>,
    pub links: Vec<Link>,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Copy with the retrieved documents set.
    #[must_use]
    pub fn with_results(self, results: Vec<Document>) -> Self {
        Self { results, ..self }
    }

    /// Copy with the summary and links set.
    #[must_use]
    pub fn with_synthesis(self, outcome: ResearchOutcome) -> Self {
        Self {
            summary: Some(outcome.summary),
            links: outcome.links,
            ..self
        }
    }

    /// Final outcome; a missing or empty summary becomes [`EMPTY_OUTCOME_MARKER`].
    pub fn into_outcome(self) -> ResearchOutcome {
        let summary = match self.summary {
            Some(summary) if !summary.is_empty() => summary,
            _ => EMPTY_OUTCOME_MARKER.to_owned(),
        };
        ResearchOutcome {
            summary,
            links: self.links,
        }
    }
}

/// Outcome prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedOutcome {
    /// Summary, marker, validation message, or error message.
    pub summary: String,
    /// Link markup, [`NO_SOURCES_MARKER`](crate::render::NO_SOURCES_MARKER),
    /// or empty for rejected and failed requests.
    pub links_html: String,
    /// The links behind `links_html`.
    pub links: Vec<Link>,
}

impl RenderedOutcome {
    fn message(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            links_html: String::new(),
            links: Vec::new(),
        }
    }
}

/// Retriever and synthesizer wired in sequence.
///
/// Holds no per-request state; share it behind an `Arc` to serve
/// concurrent queries.
#[derive(Debug, Clone)]
pub struct ResearchPipeline<P> {
    retriever: Retriever<P>,
    synthesizer: Synthesizer,
}

impl<P: SearchProvider> ResearchPipeline<P> {
    pub fn new(retriever: Retriever<P>, synthesizer: Synthesizer) -> Self {
        Self {
            retriever,
            synthesizer,
        }
    }

    /// Answer `query` for display. Never fails.
    ///
    /// A query shorter than three characters after trimming yields
    /// [`VALIDATION_MESSAGE`] without searching. A panic inside a stage
    /// yields `"Error while processing the query: ..."` with no links.
    pub async fn run(&self, query: &str) -> RenderedOutcome {
        if !is_valid_query(query) {
            tracing::info!("query rejected: fewer than 3 characters");
            return RenderedOutcome::message(VALIDATION_MESSAGE);
        }

        match AssertUnwindSafe(self.research(query)).catch_unwind().await {
            Ok(outcome) => RenderedOutcome {
                links_html: render_links(&outcome.links),
                summary: outcome.summary,
                links: outcome.links,
            },
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let error = ResearchError::Unexpected(message.clone());
                tracing::error!(error = %error, "research pipeline aborted");
                RenderedOutcome::message(format!("{UNEXPECTED_ERROR_PREFIX}: {message}"))
            }
        }
    }

    /// Retrieve then synthesize, returning the unrendered outcome.
    ///
    /// The query is trimmed but not length-checked here; a short query
    /// simply retrieves nothing.
    pub async fn research(&self, query: &str) -> ResearchOutcome {
        let state = ResearchState::new(query.trim());
        transition(ResearchStage::Start);
        tracing::trace!(query = %state.query, "research started");

        transition(ResearchStage::Searching);
        let results = match self.retriever.try_fetch(&state.query).await {
            Ok(results) => {
                if results.is_empty() {
                    transition(ResearchStage::NoResults);
                }
                results
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed, continuing with no results");
                transition(ResearchStage::SearchFailed);
                Vec::new()
            }
        };
        tracing::info!(documents = results.len(), "retrieval finished");
        let state = state.with_results(results);

        transition(ResearchStage::Synthesizing);
        let Synthesis { outcome, stage } = self.synthesizer.synthesize(&state.results).await;
        transition(stage);
        let state = state.with_synthesis(outcome);

        transition(ResearchStage::Done);
        state.into_outcome()
    }
}

fn transition(stage: ResearchStage) {
    tracing::debug!(%stage, "research stage");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "stage panicked".to_owned()
    }
}
