//! Slug generation for article URLs.
//!
//! `slugify` is pure and deterministic: the same title always yields the same
//! base slug. Uniqueness is the caller's job — on collision the mutation path
//! appends a millisecond-timestamp token via [`disambiguate`], so retried
//! slugs stay predictable in logs. The generator never touches storage.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a generated base slug in bytes.
///
/// Truncation never splits a transliteration unit (e.g. the four ASCII
/// characters produced for `щ`). Disambiguation tokens are appended on top of
/// this bound by the caller.
pub const MAX_SLUG_LEN: usize = 80;

/// Base slug used when a title contains no sluggable characters at all.
pub const SLUG_PLACEHOLDER: &str = "untitled";

/// Digit count of the disambiguation token (zero-padded millisecond epoch).
const TOKEN_DIGITS: usize = 13;

/// Matches the `-<13-digit millis>` tail appended by [`disambiguate`].
static DISAMBIGUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[0-9]{13}$").expect("valid regex"));

/// Transliterate a single lowercase Cyrillic character to ASCII.
///
/// Returns `None` for characters outside the map. The empty string is a valid
/// mapping: hard and soft signs vanish without breaking the word.
fn transliterate(c: char) -> Option<&'static str> {
    let out = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(out)
}

/// Generate a URL-safe base slug from an article title.
///
/// Lowercases, transliterates Cyrillic via a fixed character map, replaces
/// runs of whitespace/punctuation with single hyphens, trims leading/trailing
/// hyphens, and truncates to [`MAX_SLUG_LEN`] at a transliteration-unit
/// boundary. Titles with no usable characters yield [`SLUG_PLACEHOLDER`].
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(MAX_SLUG_LEN);
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        let unit: Option<&str> = if c.is_ascii_alphanumeric() {
            // Single ASCII characters are their own unit; pushed below via
            // the char to avoid allocating.
            None
        } else {
            match transliterate(c) {
                Some("") => continue,
                Some(t) => Some(t),
                None => {
                    // Separator character. Only emit a hyphen once content
                    // exists and more content follows.
                    pending_hyphen = !slug.is_empty();
                    continue;
                }
            }
        };

        let unit_len = unit.map_or(1, str::len);
        let sep_len = usize::from(pending_hyphen);
        if slug.len() + sep_len + unit_len > MAX_SLUG_LEN {
            break;
        }
        if pending_hyphen {
            slug.push('-');
            pending_hyphen = false;
        }
        match unit {
            Some(t) => slug.push_str(t),
            None => slug.push(c),
        }
    }

    let mut slug = slug.trim_matches('-').to_string();

    // A natural all-digit tail would be indistinguishable from a
    // disambiguation token, and [`strip_disambiguation`] would then eat user
    // content on a repeated collision. Drop such tails up front.
    while is_disambiguated(&slug) {
        slug.truncate(slug.len() - (TOKEN_DIGITS + 1));
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        SLUG_PLACEHOLDER.to_string()
    } else {
        slug
    }
}

/// Append a disambiguation token to a base slug.
///
/// `token` is a millisecond epoch timestamp, zero-padded to a fixed width so
/// the tail is recognizable by [`is_disambiguated`].
pub fn disambiguate(base: &str, token: i64) -> String {
    format!("{base}-{token:013}")
}

/// Whether a slug already carries a disambiguation token.
pub fn is_disambiguated(slug: &str) -> bool {
    DISAMBIGUATION_RE.is_match(slug)
}

/// Remove the disambiguation token from a slug, if present.
pub fn strip_disambiguation(slug: &str) -> &str {
    match DISAMBIGUATION_RE.find(slug) {
        Some(m) => &slug[..m.start()],
        None => slug,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
