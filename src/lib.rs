//! DeepResearch: answer a query with a condensed summary of a few web
//! search results, plus links to their sources.
//!
//! The work is a two-stage pipeline run once per query:
//! query → [`Retriever`] → documents → [`Synthesizer`] → summary + links
//!
//! # Architecture
//!
//! - **Retriever**: one text search, then normalization into at most five
//!   deduplicated, truncated [`Document`]s
//! - **Synthesizer**: aggregates document text, derives summary length
//!   bounds from its size, and calls the [`Summarizer`]
//! - **Pipeline**: validates the query, sequences the stages, and turns
//!   every failure into fallback text
//!
//! Web search lives in the `research-search` crate.

pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod retriever;
pub mod summarizer;
pub mod synthesizer;

pub use config::{LoggingConfig, ResearchConfig, SummarizerBackend, SummarizerConfig};
pub use document::Document;
pub use error::{ResearchError, Result};
pub use pipeline::{RenderedOutcome, ResearchPipeline, ResearchStage, ResearchState};
pub use retriever::Retriever;
pub use summarizer::{Summarizer, SummarizerHandle};
pub use synthesizer::{Link, ResearchOutcome, Synthesizer};
