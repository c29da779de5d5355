//! Durable per-release outcome ledger
//!
//! Every processed release id gets exactly one record. The whole state is
//! rewritten after each mutation, so a crash loses at most the item that
//! was in flight.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::json_store::{self, LoadOutcome, Versioned};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    NoResults,
    NoMatch,
    UpdateFailed,
    ApiError,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "SUCCESS",
            OutcomeStatus::NoResults => "NO_RESULTS",
            OutcomeStatus::NoMatch => "NO_MATCH",
            OutcomeStatus::UpdateFailed => "UPDATE_FAILED",
            OutcomeStatus::ApiError => "API_ERROR",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub item_id: i64,
    /// Release name, kept so failures can be retried without the database
    pub name: String,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub score: Option<i32>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState {
    pub version: u32,
    /// Insertion order; cleanup keeps the tail
    #[serde(default)]
    pub processed_ids: Vec<i64>,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Successful outcomes
    #[serde(default)]
    pub releases: BTreeMap<i64, CheckpointRecord>,
    /// Every non-success outcome
    #[serde(default)]
    pub failed_releases: BTreeMap<i64, CheckpointRecord>,
}

impl Default for CheckpointState {
    fn default() -> Self {
        Self {
            version: Self::VERSION,
            processed_ids: Vec::new(),
            last_run: None,
            releases: BTreeMap::new(),
            failed_releases: BTreeMap::new(),
        }
    }
}

impl Versioned for CheckpointState {
    const VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }
}

/// Outcome of one item, as handed to [CheckpointStore::mark_processed].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub item_id: i64,
    pub name: String,
    pub status: OutcomeStatus,
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,
    pub score: Option<i32>,
}

pub struct CheckpointStore {
    path: PathBuf,
    state: CheckpointState,
    index: HashSet<i64>,
}

impl CheckpointStore {
    /// Load the ledger. A missing file starts empty; an unreadable one is
    /// logged and replaced by an empty ledger.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match json_store::load_document::<CheckpointState>(&path) {
            LoadOutcome::Loaded(state) => state,
            LoadOutcome::Missing => CheckpointState::default(),
            LoadOutcome::Invalid(reason) => {
                warn!(path = %path.display(), reason = %reason, "Checkpoint file unreadable, starting fresh");
                CheckpointState::default()
            }
        };

        let store = Self {
            index: state.processed_ids.iter().copied().collect(),
            path,
            state,
        };
        info!(
            processed = store.processed_count(),
            successful = store.success_count(),
            failed = store.failed_count(),
            "Loaded checkpoint"
        );
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &CheckpointState {
        &self.state
    }

    pub fn is_processed(&self, id: i64) -> bool {
        self.index.contains(&id)
    }

    /// Record an outcome. Returns `Ok(false)` if the id already has a record.
    /// On a write failure the in-memory ledger keeps the record.
    pub fn mark_processed(&mut self, outcome: ItemOutcome) -> Result<bool, StoreError> {
        if self.is_processed(outcome.item_id) {
            debug!(release_id = outcome.item_id, "Release already checkpointed");
            return Ok(false);
        }

        let record = CheckpointRecord {
            item_id: outcome.item_id,
            name: outcome.name,
            status: outcome.status,
            payload: outcome.payload,
            score: outcome.score,
            processed_at: Utc::now(),
        };

        self.index.insert(record.item_id);
        self.state.processed_ids.push(record.item_id);
        if record.status.is_success() {
            self.state.releases.insert(record.item_id, record);
        } else {
            self.state.failed_releases.insert(record.item_id, record);
        }

        self.save().map(|_| true)
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        self.state.last_run = Some(Utc::now());
        json_store::save_document(&self.path, &self.state)
    }

    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.state = CheckpointState::default();
        self.index.clear();
        info!("Checkpoint reset");
        self.save()
    }

    /// Keep only the `keep` most recently added ids. Returns how many were dropped.
    pub fn cleanup(&mut self, keep: usize) -> Result<usize, StoreError> {
        let total = self.state.processed_ids.len();
        if total <= keep {
            return Ok(0);
        }

        let removed = total - keep;
        self.state.processed_ids.drain(..removed);
        self.index = self.state.processed_ids.iter().copied().collect();

        let index = &self.index;
        self.state.releases.retain(|id, _| index.contains(id));
        self.state.failed_releases.retain(|id, _| index.contains(id));

        info!(removed = removed, kept = keep, "Cleaned up checkpoint");
        self.save()?;
        Ok(removed)
    }

    /// Failed records in ledger order.
    pub fn list_failed(&self) -> Vec<&CheckpointRecord> {
        self.state
            .processed_ids
            .iter()
            .filter_map(|id| self.state.failed_releases.get(id))
            .collect()
    }

    /// Delete the record for `id` so it can be processed again.
    pub fn take_for_retry(&mut self, id: i64) -> Result<Option<CheckpointRecord>, StoreError> {
        if !self.index.remove(&id) {
            return Ok(None);
        }
        self.state.processed_ids.retain(|p| *p != id);
        let record = self
            .state
            .failed_releases
            .remove(&id)
            .or_else(|| self.state.releases.remove(&id));

        self.save()?;
        Ok(record)
    }

    /// The most recent `cap` processed ids, oldest first.
    pub fn recent_ids(&self, cap: usize) -> &[i64] {
        let ids = &self.state.processed_ids;
        &ids[ids.len().saturating_sub(cap)..]
    }

    pub fn processed_count(&self) -> usize {
        self.state.processed_ids.len()
    }

    pub fn success_count(&self) -> usize {
        self.state.releases.len()
    }

    pub fn failed_count(&self) -> usize {
        self.state.failed_releases.len()
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.state.last_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn outcome(id: i64, status: OutcomeStatus) -> ItemOutcome {
        ItemOutcome {
            item_id: id,
            name: format!("Release.{id}"),
            status,
            payload: None,
            score: None,
        }
    }

    fn store() -> (tempfile::TempDir, CheckpointStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::open(dir.path().join("tpdb_processed.json"));
        (dir, store)
    }

    #[test]
    fn test_mark_then_is_processed() {
        let (_dir, mut store) = store();
        assert!(!store.is_processed(1));
        assert!(store.mark_processed(outcome(1, OutcomeStatus::Success)).unwrap());
        assert!(store.is_processed(1));

        // A second record for the same id is refused
        assert!(!store.mark_processed(outcome(1, OutcomeStatus::NoMatch)).unwrap());
        assert_eq!(store.success_count(), 1);
        assert_eq!(store.failed_count(), 0);
    }

    #[test]
    fn test_state_survives_reopen() {
        let (dir, mut store) = store();
        store.mark_processed(outcome(5, OutcomeStatus::Success)).unwrap();
        store.mark_processed(outcome(6, OutcomeStatus::ApiError)).unwrap();

        let reopened = CheckpointStore::open(dir.path().join("tpdb_processed.json"));
        assert!(reopened.is_processed(5));
        assert!(reopened.is_processed(6));
        assert_eq!(reopened.state().failed_releases[&6].status, OutcomeStatus::ApiError);
        assert!(reopened.last_run().is_some());
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OutcomeStatus::NoResults).unwrap();
        assert_eq!(json, "\"NO_RESULTS\"");
        assert_eq!(OutcomeStatus::UpdateFailed.to_string(), "UPDATE_FAILED");
    }

    #[test]
    fn test_reset_forgets_everything() {
        let (_dir, mut store) = store();
        store.mark_processed(outcome(1, OutcomeStatus::Success)).unwrap();
        store.mark_processed(outcome(2, OutcomeStatus::NoMatch)).unwrap();
        store.reset().unwrap();
        assert!(!store.is_processed(1));
        assert!(!store.is_processed(2));
        assert_eq!(store.processed_count(), 0);
    }

    #[test]
    fn test_cleanup_keeps_most_recent() {
        let (_dir, mut store) = store();
        for id in 1..=10 {
            let status = if id % 2 == 0 { OutcomeStatus::Success } else { OutcomeStatus::NoResults };
            store.mark_processed(outcome(id, status)).unwrap();
        }

        assert_eq!(store.cleanup(4).unwrap(), 6);
        assert_eq!(store.processed_count(), 4);
        assert_eq!(store.recent_ids(100), &[7, 8, 9, 10]);
        assert!(!store.is_processed(6));
        assert_eq!(store.success_count() + store.failed_count(), 4);

        // Keeping more than exists is a no-op
        assert_eq!(store.cleanup(50).unwrap(), 0);
        assert_eq!(store.processed_count(), 4);
    }

    #[test]
    fn test_list_failed_and_retry() {
        let (_dir, mut store) = store();
        store.mark_processed(outcome(3, OutcomeStatus::NoMatch)).unwrap();
        store.mark_processed(outcome(1, OutcomeStatus::Success)).unwrap();
        store.mark_processed(outcome(2, OutcomeStatus::ApiError)).unwrap();

        let failed: Vec<i64> = store.list_failed().iter().map(|r| r.item_id).collect();
        assert_eq!(failed, vec![3, 2]);

        let record = store.take_for_retry(3).unwrap().unwrap();
        assert_eq!(record.name, "Release.3");
        assert!(!store.is_processed(3));
        assert_eq!(store.take_for_retry(3).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_reinitializes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tpdb_processed.json");
        fs::write(&path, "{\"processed_ids\": [1, 2").unwrap();

        let mut store = CheckpointStore::open(&path);
        assert_eq!(store.processed_count(), 0);
        store.mark_processed(outcome(9, OutcomeStatus::Success)).unwrap();
        assert!(CheckpointStore::open(&path).is_processed(9));
    }

    #[test]
    fn test_recent_ids_caps_exclusion_list() {
        let (_dir, mut store) = store();
        for id in 1..=5 {
            store.mark_processed(outcome(id, OutcomeStatus::Success)).unwrap();
        }
        assert_eq!(store.recent_ids(2), &[4, 5]);
        assert_eq!(store.recent_ids(0), &[] as &[i64]);
    }
}
