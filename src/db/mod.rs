//! Database connection and operations

pub mod releases;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

pub use releases::{ReleaseRepository, ReleaseRow, ReleaseStats, ReleaseStore};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(Self::get_max_connections())
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Get a releases repository
    pub fn releases(&self) -> ReleaseRepository {
        ReleaseRepository::new(self.pool.clone())
    }
}
