//! Scene URL updater job
//!
//! Pulls pending releases in batches, resolves each name against the
//! catalog, writes matched URLs back and checkpoints every outcome.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::shutdown::sleep_or_cancel;
use crate::config::Config;
use crate::db::{ReleaseRow, ReleaseStats, ReleaseStore};
use crate::error::UpdaterError;
use crate::services::checkpoint::{CheckpointStore, ItemOutcome, OutcomeStatus};
use crate::services::resolver::{ReleaseResolver, Resolution};

/// Pause between batches while pending releases remain
const BATCH_PAUSE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct UpdaterSettings {
    pub batch_size: u32,
    pub idle: Duration,
    pub check_interval: Duration,
    pub item_delay: Duration,
    pub exclusion_cap: usize,
    pub cleanup_keep: usize,
    pub cleanup_every_runs: u64,
    pub dry_run: bool,
    pub scene_url_base: String,
}

impl UpdaterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            idle: Duration::from_secs(config.idle_secs),
            check_interval: Duration::from_secs(config.check_interval_secs.max(1)),
            item_delay: Duration::from_millis(config.item_delay_ms),
            exclusion_cap: config.exclusion_cap,
            cleanup_keep: config.cleanup_keep,
            cleanup_every_runs: config.cleanup_every_runs,
            dry_run: config.dry_run,
            scene_url_base: config.scene_url_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn scene_url(&self, scene_id: &str) -> String {
        format!("{}/{}", self.scene_url_base, scene_id)
    }
}

/// Per-status tallies for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub fetched: usize,
    pub successful: usize,
    pub no_results: usize,
    pub no_match: usize,
    pub update_failed: usize,
    pub api_error: usize,
    /// Already checkpointed but outside the exclusion window
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Success => self.successful += 1,
            OutcomeStatus::NoResults => self.no_results += 1,
            OutcomeStatus::NoMatch => self.no_match += 1,
            OutcomeStatus::UpdateFailed => self.update_failed += 1,
            OutcomeStatus::ApiError => self.api_error += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.successful + self.no_results + self.no_match + self.update_failed + self.api_error
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdaterStatistics {
    pub releases: ReleaseStats,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub last_run: Option<DateTime<Utc>>,
    pub learned_performers: usize,
    pub learned_studios: usize,
}

pub fn log_statistics(stats: &UpdaterStatistics) {
    info!(
        total = stats.releases.total,
        with_url = stats.releases.with_url,
        without_url = stats.releases.without_url,
        completion = %format!("{:.2}%", stats.releases.completion_percent()),
        processed = stats.processed,
        successful = stats.successful,
        failed = stats.failed,
        last_run = ?stats.last_run,
        learned_performers = stats.learned_performers,
        learned_studios = stats.learned_studios,
        "Updater statistics"
    );
}

pub struct UrlUpdater {
    store: Arc<dyn ReleaseStore>,
    resolver: ReleaseResolver,
    checkpoint: CheckpointStore,
    settings: UpdaterSettings,
}

impl UrlUpdater {
    pub fn new(
        store: Arc<dyn ReleaseStore>,
        resolver: ReleaseResolver,
        checkpoint: CheckpointStore,
        settings: UpdaterSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            checkpoint,
            settings,
        }
    }

    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    pub fn resolver(&self) -> &ReleaseResolver {
        &self.resolver
    }

    /// Resolve one release and apply the outcome to the database.
    /// Does not touch the checkpoint.
    pub async fn process_release(&mut self, row: &ReleaseRow) -> ItemOutcome {
        info!(release_id = row.id, release = %row.releasename, "Processing release");
        let report = self.resolver.resolve(&row.releasename).await;

        let (status, payload, score) = match report.resolution {
            Resolution::Matched { best, .. } => {
                let url = self.settings.scene_url(&best.candidate.id);
                let payload = json!({
                    "url": url,
                    "scene_id": best.candidate.id,
                    "title": best.candidate.title,
                });

                let status = if self.settings.dry_run {
                    info!(release_id = row.id, url = %url, "Dry run: would update release URL");
                    OutcomeStatus::Success
                } else {
                    match self.store.update_url(row.id, &url).await {
                        Ok(true) => {
                            info!(release_id = row.id, url = %url, "Updated release URL");
                            OutcomeStatus::Success
                        }
                        Ok(false) => {
                            warn!(release_id = row.id, "Release row not updated");
                            OutcomeStatus::UpdateFailed
                        }
                        Err(e) => {
                            error!(release_id = row.id, error = %e, "Failed to update release URL");
                            OutcomeStatus::UpdateFailed
                        }
                    }
                };

                let payload = status.is_success().then(|| payload.as_object().cloned()).flatten();
                (status, payload, Some(best.score))
            }
            Resolution::NoResults => (OutcomeStatus::NoResults, None, None),
            Resolution::ApiError => (OutcomeStatus::ApiError, None, None),
            Resolution::NoConfidentMatch { top } => {
                (OutcomeStatus::NoMatch, None, top.first().map(|s| s.score))
            }
        };

        ItemOutcome {
            item_id: row.id,
            name: row.releasename.clone(),
            status,
            payload,
            score,
        }
    }

    fn record(&mut self, outcome: ItemOutcome) {
        let (id, status) = (outcome.item_id, outcome.status);
        if let Err(e) = self.checkpoint.mark_processed(outcome) {
            warn!(release_id = id, status = %status, error = %UpdaterError::from(e), "Checkpoint not persisted");
        }
    }

    /// Fetch and process one batch of pending releases.
    pub async fn process_batch(&mut self, cancel: &CancellationToken) -> Result<BatchSummary> {
        let exclude = self.checkpoint.recent_ids(self.settings.exclusion_cap).to_vec();
        let rows = self.store.fetch_pending(self.settings.batch_size, &exclude).await?;

        let mut summary = BatchSummary {
            fetched: rows.len(),
            ..Default::default()
        };
        info!(count = rows.len(), excluded = exclude.len(), "Fetched pending releases");

        for (i, row) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Shutdown requested, stopping batch");
                break;
            }
            if self.checkpoint.is_processed(row.id) {
                summary.skipped += 1;
                continue;
            }

            let outcome = self.process_release(row).await;
            summary.record(outcome.status);
            self.record(outcome);

            if i + 1 < rows.len() && sleep_or_cancel(cancel, self.settings.item_delay).await {
                break;
            }
        }

        info!(
            processed = summary.processed(),
            successful = summary.successful,
            no_results = summary.no_results,
            no_match = summary.no_match,
            update_failed = summary.update_failed,
            api_error = summary.api_error,
            "Batch complete"
        );
        Ok(summary)
    }

    /// Re-run up to `max` failed releases from the checkpoint ledger.
    pub async fn retry_failed(&mut self, max: usize, cancel: &CancellationToken) -> BatchSummary {
        let failed: Vec<ReleaseRow> = self
            .checkpoint
            .list_failed()
            .into_iter()
            .take(max)
            .map(|r| ReleaseRow {
                id: r.item_id,
                releasename: r.name.clone(),
            })
            .collect();

        info!(count = failed.len(), "Retrying failed releases");
        let mut summary = BatchSummary {
            fetched: failed.len(),
            ..Default::default()
        };

        for (i, row) in failed.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            if let Err(e) = self.checkpoint.take_for_retry(row.id) {
                warn!(release_id = row.id, error = %e, "Checkpoint not persisted after removing record");
            }

            let outcome = self.process_release(row).await;
            summary.record(outcome.status);
            self.record(outcome);

            if i + 1 < failed.len() && sleep_or_cancel(cancel, self.settings.item_delay).await {
                break;
            }
        }

        info!(successful = summary.successful, processed = summary.processed(), "Retry complete");
        summary
    }

    pub async fn statistics(&self) -> Result<UpdaterStatistics> {
        let releases = self.store.statistics().await?;
        let aliases = self.resolver.aliases();
        Ok(UpdaterStatistics {
            releases,
            processed: self.checkpoint.processed_count(),
            successful: self.checkpoint.success_count(),
            failed: self.checkpoint.failed_count(),
            last_run: self.checkpoint.last_run(),
            learned_performers: aliases.learned_performer_count(),
            learned_studios: aliases.learned_studio_count(),
        })
    }

    async fn log_current_statistics(&self) {
        match self.statistics().await {
            Ok(stats) => log_statistics(&stats),
            Err(e) => warn!(error = %e, "Failed to collect statistics"),
        }
    }

    async fn pending_count(&self) -> i64 {
        let exclude = self.checkpoint.recent_ids(self.settings.exclusion_cap);
        match self.store.count_pending(exclude).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to count pending releases");
                0
            }
        }
    }

    /// Wait up to the idle period, waking early when new releases show up.
    /// Returns true if cancelled.
    async fn idle(&self, cancel: &CancellationToken) -> bool {
        info!(idle_secs = self.settings.idle.as_secs(), "No pending releases, idling");
        let mut waited = Duration::ZERO;
        while waited < self.settings.idle {
            let step = self.settings.check_interval.min(self.settings.idle - waited);
            if sleep_or_cancel(cancel, step).await {
                return true;
            }
            waited += step;
            if self.pending_count().await > 0 {
                info!("New releases pending, resuming");
                break;
            }
        }
        false
    }

    /// The polling daemon. Returns after cancellation, or after one batch in dry-run mode.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        info!(dry_run = self.settings.dry_run, "Starting URL updater");
        let mut runs: u64 = 0;

        while !cancel.is_cancelled() {
            runs += 1;
            self.log_current_statistics().await;

            if self.settings.cleanup_every_runs > 0 && runs % self.settings.cleanup_every_runs == 0 {
                if let Err(e) = self.checkpoint.cleanup(self.settings.cleanup_keep) {
                    warn!(error = %e, "Checkpoint cleanup not persisted");
                }
            }

            let batch = match self.process_batch(&cancel).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    error!(error = %e, "Batch failed");
                    None
                }
            };

            if self.settings.dry_run {
                info!("Dry run complete");
                break;
            }
            if cancel.is_cancelled() {
                break;
            }

            let remaining = match batch {
                Some(summary) if summary.processed() > 0 => self.pending_count().await,
                _ => 0,
            };

            let cancelled = if remaining > 0 {
                info!(remaining = remaining, "More releases pending");
                sleep_or_cancel(&cancel, BATCH_PAUSE).await
            } else {
                self.idle(&cancel).await
            };
            if cancelled {
                break;
            }
        }

        self.log_current_statistics().await;
        info!("URL updater stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_build_scene_urls_without_double_slash() {
        let mut config = Config::default();
        let settings = UpdaterSettings::from_config(&config);
        assert_eq!(settings.scene_url("abc"), "https://theporndb.net/scenes/abc");

        config.scene_url_base = "https://mirror.example/scenes/".into();
        config.batch_size = 0;
        let settings = UpdaterSettings::from_config(&config);
        assert_eq!(settings.scene_url("abc"), "https://mirror.example/scenes/abc");
        assert_eq!(settings.batch_size, 1);
    }
}
