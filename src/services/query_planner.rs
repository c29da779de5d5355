//! Search query generation for a parsed release
//!
//! Queries come out most specific first; the executor runs them in order so
//! the first query that finds a scene decides which duplicate is "first seen".

use std::collections::HashSet;

use tracing::debug;

use super::aliases::AliasStore;
use super::filename_parser::{ParsedRelease, derive_title};
use super::text_utils::{normalize_key, sanitize_query};

/// Queries shorter than this (after sanitizing) are dropped.
pub const MIN_QUERY_LEN: usize = 3;

/// A derived title must be longer than this to become a query.
const MIN_TITLE_QUERY_LEN: usize = 5;

pub fn plan_queries(parsed: &ParsedRelease, aliases: &AliasStore) -> Vec<String> {
    let studio = parsed.studio.as_str();
    let performer = parsed.performer.as_str();
    let variations = aliases.performer_variations(performer);

    let mut raw_queries: Vec<String> = Vec::new();

    if !studio.is_empty() && !performer.is_empty() {
        for v in &variations {
            raw_queries.push(format!("{studio} {v}"));
            raw_queries.push(format!("{v} {studio}"));
        }
    }

    if !performer.is_empty() {
        raw_queries.extend(variations.iter().cloned());
    }

    if let (false, Some(date)) = (studio.is_empty(), parsed.date) {
        raw_queries.push(format!("{studio} {}", date.format("%Y-%m-%d")));
        if performer.chars().count() < MIN_QUERY_LEN {
            raw_queries.push(format!("{studio} {}", date.format("%Y")));
        }
    }

    let title = derive_title(parsed);
    if title.chars().count() > MIN_TITLE_QUERY_LEN {
        raw_queries.push(title);
    }

    let mut seen = HashSet::new();
    let queries: Vec<String> = raw_queries
        .iter()
        .map(|q| sanitize_query(q))
        .filter(|q| q.chars().count() >= MIN_QUERY_LEN)
        .filter(|q| seen.insert(normalize_key(q)))
        .collect();

    debug!(release = %parsed.raw, count = queries.len(), "Planned search queries");
    queries
}
