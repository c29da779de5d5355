//! PreDB updater - fills in ThePornDB scene URLs for XXX releases
//!
//! `predb-updater run` polls the releases table until interrupted; the other
//! subcommands inspect or maintain the checkpoint ledger.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use predb_updater::cli::{Cli, Command};
use predb_updater::config::Config;
use predb_updater::db::{Database, ReleaseStore};
use predb_updater::jobs::{UpdaterSettings, UrlUpdater, log_statistics, spawn_signal_listener};
use predb_updater::logging::init_logging;
use predb_updater::services::tpdb::USER_AGENT;
use predb_updater::services::{
    AliasStore, CheckpointStore, RateLimitedClient, ReleaseResolver, Resolution, ReviewLog, SearchCache,
    SearchExecutor, TpdbClient,
};

fn build_resolver(config: &Config, token: &str) -> Result<ReleaseResolver> {
    let client = RateLimitedClient::new("tpdb", USER_AGENT, config.rate_limit())?;
    let catalog = Arc::new(TpdbClient::new(client, &config.tpdb_base_url));
    let executor = SearchExecutor::new(
        catalog,
        SearchCache::new(config.cache_capacity),
        config.retry_policy(),
        Duration::from_millis(config.query_delay_ms),
    );
    let aliases = AliasStore::open(config.mappings_path(), !config.dry_run);

    Ok(ReleaseResolver::new(
        aliases,
        executor,
        config.scoring_weights(),
        ReviewLog::new(&config.log_dir),
        token,
    ))
}

async fn build_updater(config: &Config, token: &str) -> Result<UrlUpdater> {
    let db = Database::connect(&config.database_url()?).await?;
    let store: Arc<dyn ReleaseStore> = Arc::new(db.releases());

    Ok(UrlUpdater::new(
        store,
        build_resolver(config, token)?,
        CheckpointStore::open(config.checkpoint_path()),
        UpdaterSettings::from_config(config),
    ))
}

async fn resolve_one(config: &Config, release_name: &str) -> Result<()> {
    let mut resolver = build_resolver(config, config.api_key()?)?;
    let report = resolver.resolve(release_name).await;

    println!("Parsed:  {:?}", report.parsed);
    println!("Queries: {}", report.queries.join(" | "));
    match &report.resolution {
        Resolution::Matched { best, .. } => {
            let url = UpdaterSettings::from_config(config).scene_url(&best.candidate.id);
            println!("Match:   {} ({})", url, best.summary());
        }
        Resolution::NoResults => println!("No results"),
        Resolution::ApiError => println!("API error: every query failed"),
        Resolution::NoConfidentMatch { top } => {
            println!("No confident match (threshold {})", resolver.min_score());
            for scored in top {
                println!("  {} {} ({})", scored.candidate.id, scored.candidate.title, scored.summary());
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.dry_run = true;
    }

    let _guard = init_logging(&config.log_dir, config.log_file_name())?;
    info!(dry_run = config.dry_run, "Starting PreDB updater");

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    match cli.command() {
        Command::Run => {
            let token = config.api_key()?;
            let mut updater = build_updater(&config, token).await?;
            updater.run(cancel).await?;
        }
        Command::RetryFailed { max } => {
            let token = config.api_key()?;
            let mut updater = build_updater(&config, token).await?;
            let summary = updater.retry_failed(max, &cancel).await;
            println!("Retried {} releases, {} now successful", summary.processed(), summary.successful);
        }
        Command::Stats => {
            let updater = build_updater(&config, config.api_key().unwrap_or_default()).await?;
            let stats = updater.statistics().await?;
            log_statistics(&stats);
            println!(
                "Releases:    {} total, {} with URL, {} without ({:.2}% complete)",
                stats.releases.total,
                stats.releases.with_url,
                stats.releases.without_url,
                stats.releases.completion_percent()
            );
            println!(
                "Checkpoint:  {} processed, {} successful, {} failed",
                stats.processed, stats.successful, stats.failed
            );
            let last_run = stats.last_run.map(|t| t.to_rfc3339()).unwrap_or_else(|| "never".into());
            println!("Last run:    {last_run}");
            println!(
                "Learned:     {} performers, {} studios",
                stats.learned_performers, stats.learned_studios
            );
        }
        Command::Reset => {
            let mut checkpoint = CheckpointStore::open(config.checkpoint_path());
            checkpoint.reset()?;
            println!("Checkpoint reset: {}", checkpoint.path().display());
        }
        Command::Cleanup { keep } => {
            let mut checkpoint = CheckpointStore::open(config.checkpoint_path());
            let removed = checkpoint.cleanup(keep)?;
            println!("Removed {removed} entries, {} remain", checkpoint.processed_count());
        }
        Command::Resolve { release_name } => resolve_one(&config, &release_name).await?,
    }

    Ok(())
}
