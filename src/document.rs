//! Normalized search documents and the title attribution heuristic.
//!
//! Search engines tend to append the publisher to a page title
//! (`"Story headline — The Paper"`, `"Rust - Wikipedia"`). The source
//! name is whatever follows the last separator; the display title is
//! whatever precedes the first em-dash. This is a known heuristic for
//! one attribution convention, kept exactly as is.

use research_search::RawResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Maximum number of documents in one retrieval result.
pub const MAX_DOCUMENTS: usize = 5;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 500;
/// Maximum source length in characters.
pub const SOURCE_MAX_CHARS: usize = 100;

const EM_DASH: char = '—';
const HYPHEN: char = '-';

/// Keys that may hold the result url, in priority order.
const URL_KEYS: &[&str] = &["href", "url"];
/// Keys that may hold the result body text, in priority order.
const CONTENT_KEYS: &[&str] = &["body", "description", "content"];

/// A normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page title, at most [`TITLE_MAX_CHARS`] characters.
    pub title: String,
    /// Body snippet, at most [`CONTENT_MAX_CHARS`] characters.
    pub content: String,
    /// Page url; never empty.
    pub url: String,
    /// Publisher derived from the title, at most [`SOURCE_MAX_CHARS`] characters.
    pub source: String,
}

impl Document {
    /// Normalize one raw record.
    ///
    /// Returns `None` for non-object values and for records with an empty
    /// url or title. Numbers and booleans are read as their text.
    /// Deduplication is the caller's concern.
    pub fn from_raw(raw: &RawResult) -> Option<Self> {
        let record = raw.as_object()?;
        let url = first_present(record, URL_KEYS).unwrap_or_default();
        let title = first_present(record, &["title"]).unwrap_or_default();
        if url.is_empty() || title.is_empty() {
            return None;
        }
        let content = first_present(record, CONTENT_KEYS).unwrap_or_default();

        Some(Self {
            source: derive_source(&title),
            title: truncate_chars(&title, TITLE_MAX_CHARS),
            content: truncate_chars(&content, CONTENT_MAX_CHARS),
            url: url.into_owned(),
        })
    }

    /// The text block this document contributes to a summary.
    pub fn text_block(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// First non-empty scalar among `keys`, as text.
fn first_present<'a>(
    record: &'a serde_json::Map<String, RawResult>,
    keys: &[&str],
) -> Option<Cow<'a, str>> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(scalar_text))
        .find(|value| !value.is_empty())
}

/// Text of a string, number or boolean; `None` for anything else.
fn scalar_text(value: &RawResult) -> Option<Cow<'_, str>> {
    match value {
        RawResult::String(s) => Some(Cow::Borrowed(s.as_str())),
        RawResult::Number(n) => Some(Cow::Owned(n.to_string())),
        RawResult::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Truncate `text` to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_owned(),
        None => text.to_owned(),
    }
}

/// Publisher name from a page title.
///
/// Splits on `—` when the title contains one, otherwise on `-`, and
/// keeps the trimmed last segment. A title with neither separator yields
/// the whole title.
pub fn derive_source(title: &str) -> String {
    let separator = if title.contains(EM_DASH) {
        EM_DASH
    } else {
        HYPHEN
    };
    let last = title.rsplit(separator).next().unwrap_or(title);
    truncate_chars(last.trim(), SOURCE_MAX_CHARS)
}

/// Title with the em-dash attribution stripped.
///
/// Only the em-dash counts here; hyphenated titles are kept whole.
pub fn display_title(title: &str) -> &str {
    title.split(EM_DASH).next().unwrap_or(title).trim()
}
