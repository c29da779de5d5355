//! JSON-lines log of releases that found candidates but no confident match
//!
//! One file per day (`failed_matches_YYYY-MM-DD.log`), one object per line,
//! for offline review of the scoring.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use super::filename_parser::ParsedRelease;
use super::match_scorer::ScoredCandidate;

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCandidate {
    pub id: String,
    pub title: String,
    pub site: String,
    pub date: Option<NaiveDate>,
    pub performers: Vec<String>,
    pub score: i32,
    pub reasons: Vec<String>,
}

impl From<&ScoredCandidate> for ReviewCandidate {
    fn from(scored: &ScoredCandidate) -> Self {
        let c = &scored.candidate;
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            site: c.site_name.clone(),
            date: c.date,
            performers: c.performer_names.clone(),
            score: scored.score,
            reasons: scored.reasons.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    pub timestamp: DateTime<Utc>,
    pub release_name: String,
    pub parsed: ParsedRelease,
    pub top_candidates: Vec<ReviewCandidate>,
    pub best_score: i32,
    pub threshold: i32,
}

impl ReviewEntry {
    pub fn new(parsed: &ParsedRelease, top: &[ScoredCandidate], threshold: i32) -> Self {
        Self {
            timestamp: Utc::now(),
            release_name: parsed.raw.clone(),
            parsed: parsed.clone(),
            top_candidates: top.iter().take(3).map(ReviewCandidate::from).collect(),
            best_score: top.first().map(|s| s.score).unwrap_or(0),
            threshold,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewLog {
    dir: Option<PathBuf>,
}

impl ReviewLog {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    /// A log that discards every entry.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn path_for(&self, day: NaiveDate) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("failed_matches_{}.log", day.format("%Y-%m-%d"))))
    }

    /// Append one entry. Failures are logged and otherwise ignored.
    pub fn record(&self, entry: &ReviewEntry) {
        let Some(path) = self.path_for(entry.timestamp.date_naive()) else {
            return;
        };
        if let Err(e) = append_line(&path, entry) {
            warn!(path = %path.display(), error = %e, "Failed to write review log entry");
        }
    }
}

fn append_line(path: &Path, entry: &ReviewEntry) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::CandidateRecord;
    use crate::services::filename_parser::parse_release;

    fn scored(id: &str, score: i32) -> ScoredCandidate {
        ScoredCandidate {
            candidate: CandidateRecord {
                id: id.into(),
                ..Default::default()
            },
            score,
            reasons: vec!["exact date (+50)".into()],
        }
    }

    #[test]
    fn test_entries_append_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ReviewLog::new(dir.path());
        let parsed = parse_release("Studio.24.01.02.Jane.Doe.XXX");
        let top = vec![scored("a", 50), scored("b", 40), scored("c", 30), scored("d", 20)];

        let entry = ReviewEntry::new(&parsed, &top, 60);
        log.record(&entry);
        log.record(&entry);

        let path = log.path_for(entry.timestamp.date_naive()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["release_name"], "Studio.24.01.02.Jane.Doe.XXX");
        assert_eq!(value["best_score"], 50);
        assert_eq!(value["threshold"], 60);
        assert_eq!(value["top_candidates"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let log = ReviewLog::disabled();
        assert!(log.path_for(Utc::now().date_naive()).is_none());
        log.record(&ReviewEntry::new(&ParsedRelease::default(), &[], 60));
    }
}
