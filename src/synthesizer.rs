//! Aggregation and adaptive-length summarization of retrieved documents.
//!
//! The synthesizer never fails. Every degraded path (no documents, model
//! unavailable, model error, empty model output) maps to a fixed marker
//! string, and the path taken is reported as a [`ResearchStage`].

use serde::{Deserialize, Serialize};

use crate::document::{Document, MAX_DOCUMENTS, display_title};
use crate::pipeline::ResearchStage;
use crate::summarizer::SummarizerHandle;

/// Summary when retrieval produced no documents.
pub const NO_RESULTS_MARKER: &str = "No results found.";
/// Summary when the summarization model failed to initialize.
pub const NO_DATA_MARKER: &str = "No data to summarize";
/// Summary when a summarization call failed.
pub const SUMMARY_ERROR_MARKER: &str = "Error while producing the summary";
/// Summary when the model answered with empty text.
pub const EMPTY_SUMMARY_MARKER: &str = "Could not produce a summary";
/// Summary when everything else produced an empty string.
pub const EMPTY_OUTCOME_MARKER: &str = "No results";

/// Link title when the document title is empty.
pub const LINK_TITLE_PLACEHOLDER: &str = "Link";
/// Link url when the document url is empty.
pub const LINK_URL_PLACEHOLDER: &str = "#";
/// Link source when the document source is empty.
pub const LINK_SOURCE_PLACEHOLDER: &str = "Unknown source";

/// Aggregate texts with fewer words than this are returned verbatim.
pub const MIN_WORDS_TO_SUMMARIZE: usize = 10;

const MAX_LEN_FLOOR: usize = 30;
const MAX_LEN_CEILING: usize = 130;
const MIN_LEN_CAP: usize = 30;

/// Output length bounds, in words, for one summarization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Upper bound.
    pub max_len: usize,
    /// Lower bound.
    pub min_len: usize,
}

impl LengthBounds {
    /// Bounds for an input of `word_count` words, or `None` when the input
    /// is too short to be worth compressing.
    ///
    /// `max_len = clamp(W / 2, 30, 130)`, `min_len = min(30, max_len / 2)`.
    pub fn for_word_count(word_count: usize) -> Option<Self> {
        if word_count < MIN_WORDS_TO_SUMMARIZE {
            return None;
        }
        let max_len = (word_count / 2).clamp(MAX_LEN_FLOOR, MAX_LEN_CEILING);
        let min_len = MIN_LEN_CAP.min(max_len / 2);
        Some(Self { max_len, min_len })
    }
}

/// A source reference for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Page title without attribution.
    pub title: String,
    /// Target url.
    pub url: String,
    /// Publisher name.
    pub source: String,
}

impl Link {
    /// Project a document into a link, filling placeholders for empty fields.
    ///
    /// The title placeholder applies only to an empty document title; a
    /// title that is all attribution (`"— Source"`) yields an empty title.
    pub fn from_document(doc: &Document) -> Self {
        let title = if doc.title.is_empty() {
            LINK_TITLE_PLACEHOLDER
        } else {
            display_title(&doc.title)
        };
        Self {
            title: title.to_owned(),
            url: non_empty_or(&doc.url, LINK_URL_PLACEHOLDER),
            source: non_empty_or(doc.source.trim(), LINK_SOURCE_PLACEHOLDER),
        }
    }
}

fn non_empty_or(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_owned()
    } else {
        value.to_owned()
    }
}

/// Final pipeline output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchOutcome {
    /// Condensed summary or a fixed marker; never empty.
    pub summary: String,
    /// Source references in document order, at most five.
    pub links: Vec<Link>,
}

/// A [`ResearchOutcome`] plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// The outcome.
    pub outcome: ResearchOutcome,
    /// `Summarized`, `SummarizationSkipped` or `SummarizationFailed`.
    pub stage: ResearchStage,
}

/// Turns documents into a summary and links.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    model: SummarizerHandle,
}

impl Synthesizer {
    /// Create a synthesizer over a loaded (or unavailable) model.
    pub fn new(model: SummarizerHandle) -> Self {
        Self { model }
    }

    /// Summarize `documents`. Never fails.
    pub async fn summarize(&self, documents: &[Document]) -> ResearchOutcome {
        self.synthesize(documents).await.outcome
    }

    /// Like [`summarize`](Self::summarize), also reporting which path was taken.
    pub async fn synthesize(&self, documents: &[Document]) -> Synthesis {
        if documents.is_empty() {
            tracing::debug!("no documents to synthesize");
            return Synthesis {
                outcome: ResearchOutcome {
                    summary: NO_RESULTS_MARKER.to_owned(),
                    links: Vec::new(),
                },
                stage: ResearchStage::SummarizationSkipped,
            };
        }

        let documents = &documents[..documents.len().min(MAX_DOCUMENTS)];
        let aggregate = aggregate_text(documents);
        let links = documents.iter().map(Link::from_document).collect();

        let word_count = aggregate.split_whitespace().count();
        let (summary, stage) = match LengthBounds::for_word_count(word_count) {
            None => {
                tracing::debug!(word_count, "aggregate too short, returning it verbatim");
                (aggregate, ResearchStage::SummarizationSkipped)
            }
            Some(bounds) => self.reduce(&aggregate, bounds).await,
        };

        let summary = if summary.is_empty() {
            EMPTY_OUTCOME_MARKER.to_owned()
        } else {
            summary
        };

        Synthesis {
            outcome: ResearchOutcome { summary, links },
            stage,
        }
    }

    async fn reduce(&self, text: &str, bounds: LengthBounds) -> (String, ResearchStage) {
        let summarizer = match self.model.get() {
            Ok(summarizer) => summarizer,
            Err(e) => {
                tracing::warn!(error = %e, "skipping summarization");
                return failed(NO_DATA_MARKER);
            }
        };

        let LengthBounds { max_len, min_len } = bounds;
        tracing::debug!(
            backend = summarizer.name(),
            max_len,
            min_len,
            "summarizing aggregate text"
        );

        match summarizer.summarize(text, max_len, min_len).await {
            Ok(summary) if summary.trim().is_empty() => {
                let backend = summarizer.name();
                tracing::warn!(backend, "model returned an empty summary");
                failed(EMPTY_SUMMARY_MARKER)
            }
            Ok(summary) => (summary.trim().to_owned(), ResearchStage::Summarized),
            Err(e) => {
                tracing::error!(backend = summarizer.name(), error = %e, "summarization failed");
                failed(SUMMARY_ERROR_MARKER)
            }
        }
    }
}

fn failed(marker: &str) -> (String, ResearchStage) {
    (marker.to_owned(), ResearchStage::SummarizationFailed)
}

/// `title\ncontent` blocks separated by blank lines, trimmed.
pub fn aggregate_text(documents: &[Document]) -> String {
    documents
        .iter()
        .map(Document::text_block)
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_owned()
}
