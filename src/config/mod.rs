//! Application configuration management
//!
//! Settings come from an optional TOML file, then environment variables
//! (a `.env` file is honoured) override the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::UpdaterError;
use crate::services::match_scorer::ScoringWeights;
use crate::services::rate_limiter::{RateLimitConfig, RetryPolicy};
use crate::services::tpdb::{DEFAULT_BASE_URL, DEFAULT_SCENE_URL_BASE};

const APP_DIR: &str = "predb-updater";

/// Discrete MySQL connection settings, used when `database_url` is absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub name: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: Option<String>,
    pub db: DbConfig,

    /// ThePornDB bearer token
    pub tpdb_api_key: Option<String>,
    pub tpdb_base_url: String,
    /// Prefix for the URL written back to the release row
    pub scene_url_base: String,

    /// Log files, the review log and the checkpoint live here
    pub log_dir: PathBuf,
    /// Learned name mappings live here
    pub config_dir: PathBuf,

    pub batch_size: u32,
    pub idle_secs: u64,
    pub check_interval_secs: u64,
    pub dry_run: bool,
    pub min_score: i32,

    pub item_delay_ms: u64,
    pub query_delay_ms: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub rate_limit_base_ms: u64,
    pub requests_per_minute: u32,

    pub cache_capacity: usize,
    /// Most recent checkpointed ids sent to the database as an exclusion list
    pub exclusion_cap: usize,
    pub cleanup_keep: usize,
    pub cleanup_every_runs: u64,

    pub scoring: ScoringWeights,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./config"))
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db: DbConfig::default(),
            tpdb_api_key: None,
            tpdb_base_url: DEFAULT_BASE_URL.to_string(),
            scene_url_base: DEFAULT_SCENE_URL_BASE.to_string(),
            log_dir: default_log_dir(),
            config_dir: default_config_dir(),
            batch_size: 100,
            idle_secs: 300,
            check_interval_secs: 60,
            dry_run: false,
            min_score: 60,
            item_delay_ms: 2000,
            query_delay_ms: 500,
            max_attempts: 3,
            retry_delay_ms: 2000,
            rate_limit_base_ms: 5000,
            requests_per_minute: 60,
            cache_capacity: 1000,
            exclusion_cap: 10_000,
            cleanup_keep: 50_000,
            cleanup_every_runs: 10,
            scoring: ScoringWeights::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {key}: {e}")),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }

    /// Load the TOML file at `path` (missing is fine) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Ok(key) = env::var("TPDB_API_KEY") {
            if !key.trim().is_empty() {
                self.tpdb_api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("TPDB_BASE_URL") {
            self.tpdb_base_url = url;
        }
        if let Ok(dir) = env::var("PREDB_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PREDB_CONFIG_DIR") {
            self.config_dir = PathBuf::from(dir);
        }
        if let Some(batch_size) = env_parse("PREDB_BATCH_SIZE")? {
            self.batch_size = batch_size;
        }
        if let Some(min_score) = env_parse("PREDB_MIN_SCORE")? {
            self.min_score = min_score;
        }
        Ok(())
    }

    /// Explicit URL, else one composed from the `[db]` table.
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        let db = &self.db;
        let (Some(host), Some(user), Some(name)) = (&db.host, &db.user, &db.name) else {
            anyhow::bail!("No database configured (set database_url, DATABASE_URL or the [db] table)");
        };
        let port = db.port.unwrap_or(3306);
        let auth = match &db.pass {
            Some(pass) => format!("{user}:{pass}"),
            None => user.clone(),
        };
        Ok(format!("mysql://{auth}@{host}:{port}/{name}"))
    }

    pub fn api_key(&self) -> Result<&str, UpdaterError> {
        self.tpdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(UpdaterError::CredentialMissing)
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights {
            min_score: self.min_score,
            ..self.scoring.clone()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            rate_limit_base: Duration::from_millis(self.rate_limit_base_ms),
        }
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            requests_per_minute: self.requests_per_minute,
            ..RateLimitConfig::default()
        }
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        let file = if self.dry_run {
            "tpdb_processed_dryrun.json"
        } else {
            "tpdb_processed.json"
        };
        self.log_dir.join(file)
    }

    pub fn mappings_path(&self) -> PathBuf {
        self.config_dir.join("learned_mappings.json")
    }

    pub fn log_file_name(&self) -> &'static str {
        if self.dry_run {
            "tpdb_updater_dryrun.log"
        } else {
            "tpdb_updater.log"
        }
    }
}
