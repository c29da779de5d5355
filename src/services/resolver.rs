//! Release name → catalog scene resolution
//!
//! Parse, plan, search, score, select, and learn from confident matches.

use tracing::{debug, info};

use super::aliases::{AliasStore, LearningReport};
use super::filename_parser::{ParsedRelease, parse_release};
use super::match_scorer::{MatchDecision, ScoredCandidate, ScoringWeights, rank_candidates, select_best};
use super::query_planner::plan_queries;
use super::review_log::{ReviewEntry, ReviewLog};
use super::search_executor::{SearchExecutor, SearchReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched {
        best: ScoredCandidate,
        learning: LearningReport,
    },
    /// Every query completed (or was skipped) without candidates
    NoResults,
    /// Every query that ran exhausted its retries
    ApiError,
    /// Candidates found, none above the threshold (best first, at most 3)
    NoConfidentMatch { top: Vec<ScoredCandidate> },
}

#[derive(Debug, Clone)]
pub struct ResolveReport {
    pub parsed: ParsedRelease,
    pub queries: Vec<String>,
    pub search: SearchReport,
    pub resolution: Resolution,
}

pub struct ReleaseResolver {
    aliases: AliasStore,
    executor: SearchExecutor,
    weights: ScoringWeights,
    review_log: ReviewLog,
    token: String,
}

impl ReleaseResolver {
    pub fn new(
        aliases: AliasStore,
        executor: SearchExecutor,
        weights: ScoringWeights,
        review_log: ReviewLog,
        token: impl Into<String>,
    ) -> Self {
        Self {
            aliases,
            executor,
            weights,
            review_log,
            token: token.into(),
        }
    }

    pub fn aliases(&self) -> &AliasStore {
        &self.aliases
    }

    pub fn executor(&self) -> &SearchExecutor {
        &self.executor
    }

    pub fn min_score(&self) -> i32 {
        self.weights.min_score
    }

    pub async fn resolve(&mut self, raw: &str) -> ResolveReport {
        let parsed = parse_release(raw);
        let queries = plan_queries(&parsed, &self.aliases);

        if queries.is_empty() {
            debug!(release = %raw, "No usable search queries");
            return ResolveReport {
                parsed,
                queries,
                search: SearchReport::default(),
                resolution: Resolution::NoResults,
            };
        }

        let search = self.executor.execute(&queries, &self.token).await;

        let resolution = if search.candidates.is_empty() {
            if search.is_api_error() {
                Resolution::ApiError
            } else {
                Resolution::NoResults
            }
        } else {
            let ranked = rank_candidates(&parsed, &search.candidates, &self.aliases, &self.weights);
            match select_best(ranked, self.weights.min_score) {
                MatchDecision::Accepted(best) => {
                    info!(
                        release = %raw,
                        scene_id = %best.candidate.id,
                        score = best.score,
                        reasons = %best.reasons.join(", "),
                        "Confident match"
                    );
                    let learning = self.aliases.learn_from_match(&parsed, &best.candidate);
                    Resolution::Matched { best, learning }
                }
                MatchDecision::BelowThreshold(top) => {
                    info!(
                        release = %raw,
                        candidates = search.candidates.len(),
                        best_score = top.first().map(|s| s.score).unwrap_or(0),
                        threshold = self.weights.min_score,
                        "No confident match"
                    );
                    self.review_log
                        .record(&ReviewEntry::new(&parsed, &top, self.weights.min_score));
                    Resolution::NoConfidentMatch { top }
                }
                MatchDecision::NoCandidates => Resolution::NoResults,
            }
        };

        ResolveReport {
            parsed,
            queries,
            search,
            resolution,
        }
    }
}
