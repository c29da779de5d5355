//! Runs planned queries against the catalog and pools the candidates

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::catalog::{CandidateRecord, SceneSearch};
use super::rate_limiter::{RetryPolicy, retry_async};
use super::search_cache::SearchCache;

/// Aggregate result of running every planned query for one release.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReport {
    /// Unique by catalog id, first-seen order
    pub candidates: Vec<CandidateRecord>,
    /// Queries that produced an answer (results, empty, 404, or a cache hit)
    pub completed: usize,
    /// Queries that exhausted their retries
    pub failed: usize,
    pub cache_hits: usize,
    pub negative_skips: usize,
}

impl SearchReport {
    fn merge(&mut self, seen: &mut HashSet<String>, candidates: &[CandidateRecord]) {
        for candidate in candidates {
            if candidate.id.is_empty() {
                continue;
            }
            if seen.insert(candidate.id.clone()) {
                self.candidates.push(candidate.clone());
            }
        }
    }

    /// Every query that ran failed outright.
    pub fn is_api_error(&self) -> bool {
        self.completed == 0 && self.failed > 0
    }
}

pub struct SearchExecutor {
    search: Arc<dyn SceneSearch>,
    cache: SearchCache,
    retry: RetryPolicy,
    query_delay: Duration,
}

impl SearchExecutor {
    pub fn new(search: Arc<dyn SceneSearch>, cache: SearchCache, retry: RetryPolicy, query_delay: Duration) -> Self {
        Self {
            search,
            cache,
            retry,
            query_delay,
        }
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub async fn execute(&mut self, queries: &[String], token: &str) -> SearchReport {
        let mut report = SearchReport::default();
        let mut seen = HashSet::new();

        for query in queries {
            if self.cache.is_known_empty(query) {
                debug!(query = %query, "Skipping query with no results");
                report.negative_skips += 1;
                continue;
            }

            if let Some(hit) = self.cache.get(query) {
                debug!(query = %query, count = hit.len(), "Search cache hit");
                report.cache_hits += 1;
                report.completed += 1;
                report.merge(&mut seen, hit);
                continue;
            }

            let search = Arc::clone(&self.search);
            let result = retry_async(|| search.search(query, token), &self.retry, search.name()).await;

            match result {
                Ok(candidates) if candidates.is_empty() => {
                    report.completed += 1;
                    self.cache.mark_empty(query);
                }
                Ok(candidates) => {
                    report.completed += 1;
                    report.merge(&mut seen, &candidates);
                    self.cache.insert(query, candidates);
                }
                Err(e) if e.is_not_found() => {
                    report.completed += 1;
                    self.cache.mark_empty(query);
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Search query failed");
                    report.failed += 1;
                }
            }

            if !self.query_delay.is_zero() {
                tokio::time::sleep(self.query_delay).await;
            }
        }

        debug!(
            candidates = report.candidates.len(),
            completed = report.completed,
            failed = report.failed,
            cache_hits = report.cache_hits,
            "Search finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::SearchFailure;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted catalog: canned answers per query, with a call log.
    struct ScriptedSearch {
        answers: HashMap<String, Result<Vec<CandidateRecord>, SearchFailure>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSearch {
        fn new(answers: Vec<(&str, Result<Vec<CandidateRecord>, SearchFailure>)>) -> Self {
            Self {
                answers: answers.into_iter().map(|(q, a)| (q.to_string(), a)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SceneSearch for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, query: &str, _token: &str) -> Result<Vec<CandidateRecord>, SearchFailure> {
            self.calls.lock().unwrap().push(query.to_string());
            self.answers.get(query).cloned().unwrap_or(Ok(Vec::new()))
        }
    }

    fn scene(id: &str) -> CandidateRecord {
        CandidateRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    fn executor(search: Arc<ScriptedSearch>) -> SearchExecutor {
        let retry = RetryPolicy {
            max_attempts: 2,
            retry_delay: Duration::from_millis(1),
            rate_limit_base: Duration::from_millis(1),
        };
        SearchExecutor::new(search, SearchCache::new(100), retry, Duration::ZERO)
    }

    fn queries(list: &[&str]) -> Vec<String> {
        list.iter().map(|q| q.to_string()).collect()
    }

    #[tokio::test]
    async fn test_candidates_merged_by_id() {
        let search = Arc::new(ScriptedSearch::new(vec![
            ("q one", Ok(vec![scene("1"), scene("2")])),
            ("q two", Ok(vec![scene("2"), scene("3"), scene("")])),
        ]));
        let mut exec = executor(search.clone());

        let report = exec.execute(&queries(&["q one", "q two"]), "token").await;
        let ids: Vec<&str> = report.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(report.completed, 2);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_cache_short_circuits_repeat_queries() {
        let search = Arc::new(ScriptedSearch::new(vec![("hit", Ok(vec![scene("1")]))]));
        let mut exec = executor(search.clone());

        exec.execute(&queries(&["hit", "miss"]), "token").await;
        let second = exec.execute(&queries(&["HIT", "Miss"]), "token").await;

        assert_eq!(search.calls(), vec!["hit", "miss"]);
        assert_eq!(second.cache_hits, 1);
        assert_eq!(second.negative_skips, 1);
        assert_eq!(second.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_goes_to_negative_cache() {
        let search = Arc::new(ScriptedSearch::new(vec![("gone", Err(SearchFailure::Http { status: 404 }))]));
        let mut exec = executor(search.clone());

        let report = exec.execute(&queries(&["gone", "gone"]), "token").await;
        assert_eq!(report.completed, 1);
        assert_eq!(report.negative_skips, 1);
        assert_eq!(search.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_the_rest() {
        let search = Arc::new(ScriptedSearch::new(vec![
            ("broken", Err(SearchFailure::Http { status: 503 })),
            ("works", Ok(vec![scene("9")])),
        ]));
        let mut exec = executor(search.clone());

        let report = exec.execute(&queries(&["broken", "works"]), "token").await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.candidates.len(), 1);
        assert!(!report.is_api_error());
        // Two attempts for the broken query, one for the working one
        assert_eq!(search.calls(), vec!["broken", "broken", "works"]);
    }

    #[tokio::test]
    async fn test_all_failures_is_api_error() {
        let search = Arc::new(ScriptedSearch::new(vec![("a b c", Err(SearchFailure::Transport("down".into())))]));
        let mut exec = executor(search);

        let report = exec.execute(&queries(&["a b c"]), "token").await;
        assert!(report.is_api_error());
    }
}
