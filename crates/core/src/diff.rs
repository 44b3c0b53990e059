//! Token-level text diffing for version comparison.
//!
//! Output is for human review, not a patch format: tokens are word-ish chunks
//! (runs of non-whitespace or whitespace), diffed with LCS and coalesced into
//! segments. The round-trip invariant is what the version UI relies on:
//! concatenating all non-removed segments reconstructs the new text, and all
//! non-added segments reconstruct the old text.

use serde::Serialize;

/// One run of text in a diff result.
///
/// `added` and `removed` are mutually exclusive; both `false` means the text
/// is common to both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub text: String,
    pub added: bool,
    pub removed: bool,
}

/// Token class used during diffing; the output order convention is
/// removed-before-added within a changed region.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    Same,
    Add,
    Del,
}

/// Split text into alternating runs of non-whitespace and whitespace.
///
/// Concatenating the tokens reproduces the input byte-for-byte, which is what
/// gives the diff its round-trip property.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev_is_ws: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_ws = c.is_whitespace();
        if let Some(prev) = prev_is_ws {
            if prev != is_ws {
                tokens.push(&text[start..i]);
                start = i;
            }
        }
        prev_is_ws = Some(is_ws);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Compute a token-level diff between two texts.
///
/// Adjacent tokens of the same class are coalesced into one segment.
/// `diff_texts("", new)` yields a single added segment.
pub fn diff_texts(old: &str, new: &str) -> Vec<DiffSegment> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    // Trim the common prefix and suffix before the quadratic LCS pass; most
    // edits touch a small region of the document.
    let mut prefix = 0;
    while prefix < old_tokens.len()
        && prefix < new_tokens.len()
        && old_tokens[prefix] == new_tokens[prefix]
    {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < old_tokens.len() - prefix
        && suffix < new_tokens.len() - prefix
        && old_tokens[old_tokens.len() - 1 - suffix] == new_tokens[new_tokens.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let old_mid = &old_tokens[prefix..old_tokens.len() - suffix];
    let new_mid = &new_tokens[prefix..new_tokens.len() - suffix];

    let mut ops: Vec<(Op, &str)> = Vec::with_capacity(old_tokens.len() + new_tokens.len());
    ops.extend(old_tokens[..prefix].iter().map(|t| (Op::Same, *t)));
    ops.extend(diff_middle(old_mid, new_mid));
    ops.extend(
        old_tokens[old_tokens.len() - suffix..]
            .iter()
            .map(|t| (Op::Same, *t)),
    );

    coalesce(&ops)
}

/// LCS diff over the changed middle region, in output order.
fn diff_middle<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<(Op, &'a str)> {
    let m = old.len();
    let n = new.len();

    // Build LCS table.
    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            if old[i - 1] == new[j - 1] {
                lcs[i][j] = lcs[i - 1][j - 1] + 1;
            } else {
                lcs[i][j] = lcs[i - 1][j].max(lcs[i][j - 1]);
            }
        }
    }

    // Backtrack to produce the op stream.
    let mut ops = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            ops.push((Op::Same, old[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            ops.push((Op::Add, new[j - 1]));
            j -= 1;
        } else {
            ops.push((Op::Del, old[i - 1]));
            i -= 1;
        }
    }

    ops.reverse();
    ops
}

/// Merge consecutive same-class tokens into segments.
fn coalesce(ops: &[(Op, &str)]) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();
    for (op, token) in ops {
        let (added, removed) = match op {
            Op::Same => (false, false),
            Op::Add => (true, false),
            Op::Del => (false, true),
        };
        match segments.last_mut() {
            Some(last) if last.added == added && last.removed == removed => {
                last.text.push_str(token);
            }
            _ => segments.push(DiffSegment {
                text: token.to_string(),
                added,
                removed,
            }),
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Joining all non-removed segments must equal `new`; all non-added
    /// segments must equal `old`.
    fn assert_round_trip(old: &str, new: &str) {
        let segments = diff_texts(old, new);
        let rebuilt_new: String = segments
            .iter()
            .filter(|s| !s.removed)
            .map(|s| s.text.as_str())
            .collect();
        let rebuilt_old: String = segments
            .iter()
            .filter(|s| !s.added)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(rebuilt_new, new, "non-removed segments must rebuild new");
        assert_eq!(rebuilt_old, old, "non-added segments must rebuild old");
    }

    #[test]
    fn identical_texts_yield_one_unchanged_segment() {
        let text = "alpha beta gamma";
        let segments = diff_texts(text, text);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, text);
        assert!(!segments[0].added && !segments[0].removed);
    }

    #[test]
    fn both_empty_yields_no_segments() {
        assert!(diff_texts("", "").is_empty());
    }

    #[test]
    fn empty_old_is_single_added_segment() {
        let segments = diff_texts("", "brand new body\nwith two lines");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].added);
        assert_eq!(segments[0].text, "brand new body\nwith two lines");
    }

    #[test]
    fn empty_new_is_single_removed_segment() {
        let segments = diff_texts("old body", "");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].removed);
    }

    #[test]
    fn word_insertion() {
        let segments = diff_texts("the cat sat", "the small cat sat");
        assert!(segments.iter().any(|s| s.added && s.text.contains("small")));
        assert!(!segments.iter().any(|s| s.removed));
        assert_round_trip("the cat sat", "the small cat sat");
    }

    #[test]
    fn word_removal() {
        let segments = diff_texts("the small cat sat", "the cat sat");
        assert!(segments.iter().any(|s| s.removed && s.text.contains("small")));
        assert!(!segments.iter().any(|s| s.added));
        assert_round_trip("the small cat sat", "the cat sat");
    }

    #[test]
    fn word_replacement_has_removed_and_added() {
        let segments = diff_texts("status: draft", "status: published");
        assert!(segments.iter().any(|s| s.removed && s.text == "draft"));
        assert!(segments.iter().any(|s| s.added && s.text == "published"));
        assert_round_trip("status: draft", "status: published");
    }

    #[test]
    fn round_trip_multiline_edit() {
        let old = "# Title\n\nfirst paragraph here\n\nsecond paragraph";
        let new = "# Title\n\nfirst paragraph, edited\n\nsecond paragraph\n\nthird one";
        assert_round_trip(old, new);
    }

    #[test]
    fn round_trip_whitespace_only_change() {
        assert_round_trip("a  b", "a b");
        assert_round_trip("a b", "a\nb");
    }

    #[test]
    fn round_trip_full_rewrite() {
        assert_round_trip("completely different", "nothing in common here");
    }

    #[test]
    fn tokenize_round_trips_exactly() {
        let text = "  leading, and trailing  \n\ttabs too ";
        let rebuilt: String = tokenize(text).concat();
        assert_eq!(rebuilt, text);
    }
}
