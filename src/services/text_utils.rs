//! Shared text normalization and comparison utilities
//!
//! Every fuzzy comparison in the matcher goes through [similarity], so the
//! underlying measure can be swapped without touching the scoring code.

use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel boundary regex"));

static QUERY_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-]").expect("query sanitize regex"));

/// Similarity between two strings (0.0 to 1.0).
///
/// Case-insensitive, symmetric and deterministic. Uses the rapidfuzz Indel
/// ratio (`2 * LCS / (len1 + len2)`), which is calibrated like a
/// common-character overlap percentage. Empty input never matches.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    use rapidfuzz::distance::indel;

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    indel::normalized_similarity(a.chars(), b.chars()).clamp(0.0, 1.0)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Insert a space at every lower→upper letter transition ("AbellaDanger" → "Abella Danger").
pub fn split_camel_case(s: &str) -> String {
    CAMEL_BOUNDARY.replace_all(s, "$1 $2").into_owned()
}

/// Make a query safe for the search API: anything other than word characters,
/// whitespace and hyphens becomes a space, then whitespace is collapsed.
pub fn sanitize_query(query: &str) -> String {
    collapse_whitespace(&QUERY_UNSAFE.replace_all(query, " "))
}

/// Lowercased, whitespace-collapsed form used for case-insensitive keys.
pub fn normalize_key(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}
