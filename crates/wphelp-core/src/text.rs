//! Text normalization helpers.
//!
//! All operations count and slice by Unicode scalar value (`char`), never by
//! byte, so multibyte input is never split mid-character.
//!
//! ```
//! use wphelp_core::text;
//!
//! assert!(text::starts_with("café au lait", "café"));
//! assert!(!text::contains("anything", ""));
//! assert_eq!(text::truncate("Hello, world", 8, text::DEFAULT_OMISSION), "Hello...");
//! ```

use crate::error::Result;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

/// Omission marker used by [`truncate`] callers that have no preference.
pub const DEFAULT_OMISSION: &str = "...";

/// Length used by [`excerpt`] callers that have no preference.
pub const DEFAULT_EXCERPT_LENGTH: usize = 110;

/// Separator pattern used by [`to_list_no_empty`] callers that have no preference.
pub const DEFAULT_LINE_PATTERN: &str = r"\r\n|[\r\n]";

/// Letters, combining marks, decimal digits, space separators, punctuation,
/// math and currency symbols. Everything else is removed by [`sanitize_utf8`].
const SANE_UTF8_PATTERN: &str = r"[^\p{L}\p{Mn}\p{Mc}\p{Nd}\p{Zs}\p{P}\p{Sm}\p{Sc}]";

static SANE_UTF8_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(SANE_UTF8_PATTERN));

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(?:script|style)>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BREAKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));
static PARTIAL_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[^;\s]{0,6}$").expect("valid regex"));

/// True if `needle` is a prefix of `haystack`. An empty needle always matches.
pub fn starts_with(haystack: &str, needle: &str) -> bool {
    haystack.starts_with(needle)
}

/// True if `needle` is a suffix of `haystack`. An empty needle always matches.
pub fn ends_with(haystack: &str, needle: &str) -> bool {
    haystack.ends_with(needle)
}

/// True if `needle` occurs in `haystack`.
///
/// Unlike [`starts_with`] and [`ends_with`], an empty needle never matches.
pub fn contains(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(needle)
}

/// Truncate `s` to at most `length` characters, replacing the tail with
/// `omission`.
///
/// Strings already within `length` characters are returned unchanged. When
/// `length` is shorter than the omission itself, the kept prefix is empty and
/// the result is just the omission.
pub fn truncate(s: &str, length: usize, omission: &str) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let keep = length.saturating_sub(omission.chars().count());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(omission);
    out
}

/// Keep only printable ASCII (codepoints 33 through 126). Spaces, control
/// characters and everything above `~` are removed.
pub fn to_ascii(s: &str) -> String {
    s.chars().filter(|c| ('!'..='~').contains(c)).collect()
}

/// Remove invisible characters, unassigned codepoints and other oddities,
/// keeping the common categories of real text.
///
/// Allowed: letters (L), nonspacing and spacing marks (Mn, Mc), decimal
/// digits (Nd), space separators (Zs), punctuation (P), math symbols (Sm)
/// and currency symbols (Sc).
///
/// If the pattern engine cannot be initialized the input is returned
/// unchanged.
pub fn sanitize_utf8(s: &str) -> String {
    sanitize_with(&SANE_UTF8_RE, s)
}

fn sanitize_with(pattern: &std::result::Result<Regex, regex::Error>, s: &str) -> String {
    match pattern {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(err) => {
            warn!(error = %err, "unicode sanitizer unavailable, returning input unchanged");
            s.to_string()
        }
    }
}

/// Check that a value is present and not the empty string.
pub fn is_non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

/// Trim `s`, then split it on `sep`.
///
/// ```
/// use wphelp_core::text::to_list;
/// assert_eq!(to_list(" a,b,,c ", ","), vec!["a", "b", "", "c"]);
/// ```
pub fn to_list<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    s.trim().split(sep).collect()
}

/// Split `s` on the regular expression `pattern`, trim every part and drop
/// the empty ones.
pub fn to_list_no_empty(s: &str, pattern: &str) -> Result<Vec<String>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let re = Regex::new(pattern)?;
    Ok(re
        .split(s)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect())
}

/// Kind of match performed by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    #[default]
    Exact,
    Start,
    End,
    Contains,
    /// `needle` is a regular expression searched for in `haystack`.
    Regex,
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" | "exact" => Ok(Comparison::Exact),
            "start" => Ok(Comparison::Start),
            "end" => Ok(Comparison::End),
            "contains" => Ok(Comparison::Contains),
            "regex" => Ok(Comparison::Regex),
            other => Err(format!(
                "unknown comparison '{}', expected one of: exact, start, end, contains, regex",
                other
            )),
        }
    }
}

/// Compare `needle` against `haystack` using `comparison`.
///
/// Fails only for [`Comparison::Regex`] with an invalid pattern.
pub fn compare(needle: &str, haystack: &str, comparison: Comparison) -> Result<bool> {
    Ok(match comparison {
        Comparison::Exact => needle == haystack,
        Comparison::Start => starts_with(haystack, needle),
        Comparison::End => ends_with(haystack, needle),
        Comparison::Contains => contains(haystack, needle),
        Comparison::Regex => Regex::new(needle)?.is_match(haystack),
    })
}

/// Plain-text excerpt of at most `length` characters that does not end
/// mid-word or mid-entity.
///
/// Markup tags are removed (along with the bodies of `<script>` and
/// `<style>` elements) and whitespace runs collapse to a single space. If
/// the text had to be shortened, it is cut back to the last space; a single
/// over-long word therefore yields an empty excerpt.
pub fn excerpt(s: &str, length: usize) -> String {
    let plain = strip_tags(s);
    let head: String = plain.chars().take(length).collect();
    let head = PARTIAL_ENTITY_RE.replace(&head, "").into_owned();
    if head == plain {
        return head;
    }
    match head.trim().rfind(' ') {
        Some(byte_pos) => {
            let chars = head.trim()[..byte_pos].chars().count();
            plain.chars().take(chars).collect()
        }
        None => String::new(),
    }
}

fn strip_tags(s: &str) -> String {
    let s = SCRIPT_STYLE_RE.replace_all(s, "");
    let s = TAG_RE.replace_all(&s, "");
    BREAKS_RE.replace_all(&s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_fails_open_without_pattern() {
        let broken: std::result::Result<Regex, regex::Error> = Regex::new(r"[");
        assert!(broken.is_err());
        assert_eq!(sanitize_with(&broken, "a\u{200d}b"), "a\u{200d}b");
    }

    #[test]
    fn excerpt_cut_back_is_char_based() {
        // The trimmed excerpt starts at the same character as the plain text.
        assert_eq!(excerpt("ééé ééé ééé", 9), "ééé ééé");
    }
}
