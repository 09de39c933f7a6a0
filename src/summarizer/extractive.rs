//! Lead-sentence extraction.
//!
//! Keeps whole sentences from the start of the text while they fit in
//! `max_length` words. If that yields fewer than `min_length` words, the
//! first `max_length` words are used instead. Deterministic and offline.

use async_trait::async_trait;

use super::{Summarizer, truncate_words};
use crate::error::Result;

/// Summarizer that needs no model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String> {
        Ok(lead_sentences(text, max_length, min_length))
    }
}

/// Greedy lead-sentence selection within the word bounds.
pub fn lead_sentences(text: &str, max_length: usize, min_length: usize) -> String {
    let mut kept: Vec<String> = Vec::new();
    let mut words = 0;

    for sentence in split_sentences(text) {
        let count = sentence.split_whitespace().count();
        if words + count > max_length {
            break;
        }
        words += count;
        kept.push(sentence);
    }

    if words < min_length {
        return truncate_words(text, max_length);
    }
    kept.join(" ")
}

/// Split on `.`, `!` or `?` followed by whitespace, and on line breaks.
/// Whitespace inside each sentence is collapsed.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            push_sentence(&mut sentences, &current);
            current.clear();
            continue;
        }
        current.push(c);
        let at_boundary = chars.peek().is_none_or(|next| next.is_whitespace());
        if matches!(c, '.' | '!' | '?') && at_boundary {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        sentences.push(normalized);
    }
}
