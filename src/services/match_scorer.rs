//! Weighted scoring of catalog candidates against a parsed release
//!
//! ## Scoring Formula
//! ```text
//! score = date + studio + performer + title + duration bonus + tag bonus
//! ```
//!
//! Each factor takes the first tier it satisfies. A perfect date, studio and
//! performer match already reaches 100; the bonuses can push past it.

use serde::{Deserialize, Serialize};

use super::aliases::AliasStore;
use super::catalog::CandidateRecord;
use super::filename_parser::ParsedRelease;
use super::text_utils::similarity;

/// Default weights (nominal total = 100 before bonuses)
pub mod weights {
    pub const DATE_EXACT: i32 = 50;
    pub const DATE_NEAR: i32 = 25;
    pub const DATE_NEAR_DAYS: i64 = 7;
    pub const STUDIO: i32 = 30;
    pub const PERFORMER_LEARNED: i32 = 25;
    pub const PERFORMER_EXACT: i32 = 20;
    pub const PERFORMER_SUBSTRING: i32 = 18;
    pub const PERFORMER_WORDS: i32 = 15;
    pub const PERFORMER_FUZZY: i32 = 20;
    pub const TITLE_STRONG: i32 = 15;
    pub const TITLE_WEAK: i32 = 10;
    pub const DURATION_BONUS: i32 = 5;
    pub const TAG_BONUS: i32 = 5;
    pub const MIN_SCORE: i32 = 60;
}

/// Tunable scoring parameters. Every field defaults to [weights].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub date_exact: i32,
    pub date_near: i32,
    pub date_near_days: i64,
    pub studio: i32,
    pub performer_learned: i32,
    pub performer_exact: i32,
    pub performer_substring: i32,
    pub performer_words: i32,
    pub performer_fuzzy: i32,
    pub title_strong: i32,
    pub title_weak: i32,
    pub duration_bonus: i32,
    pub tag_bonus: i32,
    /// Similarity above which a fuzzy studio/performer/title tier applies
    pub fuzzy_threshold: f64,
    /// Lower title tier threshold
    pub title_weak_threshold: f64,
    /// Confidence threshold for accepting the top candidate
    pub min_score: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            date_exact: weights::DATE_EXACT,
            date_near: weights::DATE_NEAR,
            date_near_days: weights::DATE_NEAR_DAYS,
            studio: weights::STUDIO,
            performer_learned: weights::PERFORMER_LEARNED,
            performer_exact: weights::PERFORMER_EXACT,
            performer_substring: weights::PERFORMER_SUBSTRING,
            performer_words: weights::PERFORMER_WORDS,
            performer_fuzzy: weights::PERFORMER_FUZZY,
            title_strong: weights::TITLE_STRONG,
            title_weak: weights::TITLE_WEAK,
            duration_bonus: weights::DURATION_BONUS,
            tag_bonus: weights::TAG_BONUS,
            fuzzy_threshold: 0.8,
            title_weak_threshold: 0.6,
            min_score: weights::MIN_SCORE,
        }
    }
}

/// A candidate with its score and the reasons that produced it, in factor order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: CandidateRecord,
    pub score: i32,
    pub reasons: Vec<String>,
}

impl ScoredCandidate {
    pub fn summary(&self) -> String {
        format!("{} [{}]", self.score, self.reasons.join(", "))
    }
}

/// Outcome of ranking all candidates for one release.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    Accepted(ScoredCandidate),
    /// Best candidates (highest first) when none reached the threshold
    BelowThreshold(Vec<ScoredCandidate>),
    NoCandidates,
}

fn weighted(weight: i32, sim: f64) -> i32 {
    (weight as f64 * sim).floor() as i32
}

/// Everything [score_candidate] needs about the release, computed once.
pub struct MatchContext<'a> {
    pub parsed: &'a ParsedRelease,
    /// Raw name with studio, date, performer and tags removed
    pub derived_title: String,
    studio_variations: Vec<String>,
    performer_variations: Vec<String>,
    learned_performer: Option<String>,
    normalized_performer: String,
}

impl<'a> MatchContext<'a> {
    pub fn new(parsed: &'a ParsedRelease, aliases: &AliasStore) -> Self {
        let studio_variations = if parsed.studio.is_empty() {
            Vec::new()
        } else {
            aliases.normalize_studio(&parsed.studio)
        };
        let normalized_performer = if parsed.performer.is_empty() {
            String::new()
        } else {
            aliases.normalize_performer(&parsed.performer).to_lowercase()
        };

        Self {
            parsed,
            derived_title: super::filename_parser::derive_title(parsed),
            studio_variations,
            performer_variations: aliases.performer_variations(&parsed.performer),
            learned_performer: aliases.learned_performer(&parsed.performer).map(str::to_string),
            normalized_performer,
        }
    }
}

fn score_date(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> Option<(i32, String)> {
    let (parsed, found) = (ctx.parsed.date?, candidate.date?);
    let days = (parsed - found).num_days().abs();
    if days == 0 {
        Some((w.date_exact, "exact date".to_string()))
    } else if days <= w.date_near_days {
        Some((w.date_near, format!("date within {days} days")))
    } else {
        None
    }
}

fn score_studio(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> Option<(i32, String)> {
    let site = candidate.site_name.as_str();
    if site.is_empty() || ctx.parsed.studio.is_empty() {
        return None;
    }

    if ctx.studio_variations.iter().any(|v| v.eq_ignore_ascii_case(site)) {
        return Some((w.studio, format!("studio alias '{site}'")));
    }

    let sim = similarity(site, &ctx.parsed.studio);
    (sim > w.fuzzy_threshold).then(|| (weighted(w.studio, sim), format!("studio similar {:.0}%", sim * 100.0)))
}

fn score_performer(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> Option<(i32, String)> {
    let names = &candidate.performer_names;
    if ctx.parsed.performer.is_empty() || names.is_empty() {
        return None;
    }

    if let Some(learned) = &ctx.learned_performer {
        if names.iter().any(|n| n.eq_ignore_ascii_case(learned)) {
            return Some((w.performer_learned, format!("learned performer '{learned}'")));
        }
    }

    if let Some(name) = names
        .iter()
        .find(|n| ctx.performer_variations.iter().any(|v| v.eq_ignore_ascii_case(n)))
    {
        return Some((w.performer_exact, format!("performer '{name}'")));
    }

    let parsed = ctx.normalized_performer.as_str();
    if let Some(name) = names.iter().find(|n| {
        let lower = n.to_lowercase();
        !lower.is_empty() && !parsed.is_empty() && (lower.contains(parsed) || parsed.contains(&lower))
    }) {
        return Some((w.performer_substring, format!("performer partial '{name}'")));
    }

    let candidate_words: Vec<String> = names
        .iter()
        .flat_map(|n| n.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>())
        .collect();
    let matching_words = parsed
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| candidate_words.iter().any(|c| similarity(word, c) > w.fuzzy_threshold))
        .count();
    if matching_words >= 2 {
        return Some((w.performer_words, format!("performer words matched {matching_words}")));
    }

    let best = ctx
        .performer_variations
        .iter()
        .flat_map(|v| names.iter().map(move |n| similarity(v, n)))
        .fold(0.0_f64, f64::max);
    (best > w.fuzzy_threshold).then(|| {
        (
            weighted(w.performer_fuzzy, best),
            format!("performer similar {:.0}%", best * 100.0),
        )
    })
}

fn score_title(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> Option<(i32, String)> {
    if ctx.derived_title.is_empty() || candidate.title.is_empty() {
        return None;
    }

    let sim = similarity(&ctx.derived_title, &candidate.title);
    let points = if sim > w.fuzzy_threshold {
        weighted(w.title_strong, sim)
    } else if sim > w.title_weak_threshold {
        weighted(w.title_weak, sim)
    } else {
        return None;
    };
    Some((points, format!("title similar {:.0}%", sim * 100.0)))
}

fn score_tags(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> Option<(i32, String)> {
    let raw = ctx.parsed.raw.to_lowercase();
    candidate
        .tags
        .iter()
        .find(|tag| !tag.is_empty() && raw.contains(&tag.to_lowercase()))
        .map(|tag| (w.tag_bonus, format!("tag '{tag}'")))
}

pub fn score_candidate(ctx: &MatchContext, candidate: &CandidateRecord, w: &ScoringWeights) -> ScoredCandidate {
    let factors = [
        score_date(ctx, candidate, w),
        score_studio(ctx, candidate, w),
        score_performer(ctx, candidate, w),
        score_title(ctx, candidate, w),
        candidate
            .duration
            .filter(|d| *d > 0)
            .map(|_| (w.duration_bonus, "has duration".to_string())),
        score_tags(ctx, candidate, w),
    ];

    let mut score = 0;
    let mut reasons = Vec::new();
    for (points, reason) in factors.into_iter().flatten() {
        score += points;
        reasons.push(format!("{reason} (+{points})"));
    }

    ScoredCandidate {
        candidate: candidate.clone(),
        score,
        reasons,
    }
}

/// Score every candidate, highest first. Ties keep catalog order.
pub fn rank_candidates(
    parsed: &ParsedRelease,
    candidates: &[CandidateRecord],
    aliases: &AliasStore,
    w: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let ctx = MatchContext::new(parsed, aliases);
    let mut scored: Vec<ScoredCandidate> = candidates.iter().map(|c| score_candidate(&ctx, c, w)).collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Accept the top candidate if it clears `min_score`.
pub fn select_best(ranked: Vec<ScoredCandidate>, min_score: i32) -> MatchDecision {
    let Some(top) = ranked.first() else {
        return MatchDecision::NoCandidates;
    };

    if top.score >= min_score {
        let mut ranked = ranked;
        MatchDecision::Accepted(ranked.swap_remove(0))
    } else {
        MatchDecision::BelowThreshold(ranked.into_iter().take(3).collect())
    }
}
