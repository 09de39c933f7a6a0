//! HTML and plain-text rendering of source links.

use crate::synthesizer::Link;

/// Emitted instead of an empty link list.
pub const NO_SOURCES_MARKER: &str = "No sources found";

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render one link as a self-contained block.
#[must_use]
pub fn render_link(link: &Link) -> String {
    format!(
        "<div style=\"margin-bottom: 8px;\">\
         <a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\" \
         style=\"text-decoration: none; color: #1E90FF; font-weight: bold;\">{title}</a> \
         — <span style=\"color: #555;\">{source}</span></div>",
        url = html_escape(&link.url),
        title = html_escape(&link.title),
        source = html_escape(&link.source),
    )
}

/// Render all links with a url, or [`NO_SOURCES_MARKER`] if none remain.
#[must_use]
pub fn render_links(links: &[Link]) -> String {
    let blocks: Vec<String> = links
        .iter()
        .filter(|link| !link.url.is_empty())
        .map(render_link)
        .collect();
    if blocks.is_empty() {
        return NO_SOURCES_MARKER.to_owned();
    }
    blocks.concat()
}

/// Numbered plain-text list, one `title (source) url` line per link.
#[must_use]
pub fn render_links_text(links: &[Link]) -> String {
    let lines: Vec<String> = links
        .iter()
        .filter(|link| !link.url.is_empty())
        .enumerate()
        .map(|(i, link)| format!("{}. {} ({}) {}", i + 1, link.title, link.source, link.url))
        .collect();
    if lines.is_empty() {
        return NO_SOURCES_MARKER.to_owned();
    }
    lines.join("\n")
}
