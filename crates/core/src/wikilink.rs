//! Wiki-link extraction from markdown bodies.
//!
//! A wiki link is a `[[Title]]` reference. The extractor is a pure primitive:
//! it preserves first-seen order and does not deduplicate, so it can also
//! back editor-side autocomplete. Deduplication belongs to the link-graph
//! synchronizer via [`dedupe_titles`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Regex pattern matching one `[[Title]]` occurrence.
///
/// Non-greedy, and the character class keeps a match on a single line: an
/// unterminated `[[` before a newline is not a link.
pub const WIKILINK_PATTERN: &str = r"\[\[([^\[\]\r\n]+?)\]\]";

/// Compiled wiki-link regex. Compiled once, reused forever.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WIKILINK_PATTERN).expect("valid regex"));

/// Extract every `[[Title]]` reference from a markdown body.
///
/// Titles are trimmed but keep their original casing — matching against
/// existing articles is case-insensitive, display is not. Whitespace-only
/// references are dropped.
pub fn extract_links(body: &str) -> Vec<&str> {
    WIKILINK_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let title = caps.get(1).expect("capture group 1").as_str().trim();
            (!title.is_empty()).then_some(title)
        })
        .collect()
}

/// Deduplicate referenced titles case-insensitively, preserving first-seen
/// order. The first spelling of a title wins.
pub fn dedupe_titles<'a>(titles: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    titles
        .iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
