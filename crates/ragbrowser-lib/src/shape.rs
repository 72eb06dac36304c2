//! Response shaping for size-limited consumers.
//!
//! Agent action groups reject response bodies above 25 KB. The count cap in
//! [`crate::params::normalize`] together with per-result truncation keeps the
//! joined body below that ceiling without measuring it exactly.

use crate::model::SearchResult;

/// Characters kept from each result body.
pub const TRUNCATE_TEXT_LENGTH: usize = 5000;
/// Appended to every truncated body, including bodies shorter than the limit.
pub const TRUNCATION_MARKER: &str = "...";
/// Response size ceiling imposed by the agent platform.
pub const RESPONSE_SIZE_LIMIT_BYTES: usize = 25_600;

/// Keep the first `limit` characters of `body` and append the marker.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_body(body: &str, limit: usize) -> String {
    let end = body
        .char_indices()
        .nth(limit)
        .map(|(idx, _)| idx)
        .unwrap_or(body.len());
    let mut out = String::with_capacity(end + TRUNCATION_MARKER.len());
    out.push_str(&body[..end]);
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Shape results into a single body: each result's markdown truncated to
/// [`TRUNCATE_TEXT_LENGTH`] characters, joined with newlines.
///
/// Results without markdown contribute just the marker. The result count is
/// not re-checked here.
pub fn shape_markdown_bodies(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            let markdown = result.markdown.as_deref().unwrap_or_default();
            truncate_body(markdown, TRUNCATE_TEXT_LENGTH)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when `body` is larger than the platform accepts.
pub fn exceeds_response_limit(body: &str) -> bool {
    body.len() > RESPONSE_SIZE_LIMIT_BYTES
}

/// Display preview of a result's plain text, for terminals only.
pub fn preview(result: &SearchResult, chars: usize) -> String {
    match result.text.as_deref() {
        Some(text) => truncate_body(text, chars),
        None => format!("N/A{}", TRUNCATION_MARKER),
    }
}
