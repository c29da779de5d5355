//! Releases table operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

/// A release still waiting for a scene URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRow {
    pub id: i64,
    pub releasename: String,
}

impl sqlx::FromRow<'_, MySqlRow> for ReleaseRow {
    fn from_row(row: &MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            releasename: row.try_get("releasename")?,
        })
    }
}

/// Scene release counts across the whole table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseStats {
    pub total: i64,
    pub with_url: i64,
    pub without_url: i64,
}

impl ReleaseStats {
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_url as f64 * 100.0 / self.total as f64
        }
    }
}

/// Source of pending releases and sink for resolved URLs.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Pending releases, newest first, skipping `exclude`.
    async fn fetch_pending(&self, limit: u32, exclude: &[i64]) -> Result<Vec<ReleaseRow>>;

    async fn count_pending(&self, exclude: &[i64]) -> Result<i64>;

    /// Returns false if no row was updated.
    async fn update_url(&self, id: i64, url: &str) -> Result<bool>;

    async fn statistics(&self) -> Result<ReleaseStats>;
}

const PENDING_FILTER: &str = " WHERE (url IS NULL OR url = '') \
     AND releasename LIKE '%.XXX.%' \
     AND UPPER(releasename) NOT LIKE '%IMAGESET%'";

fn push_exclusions(qb: &mut QueryBuilder<'_, MySql>, exclude: &[i64]) {
    if exclude.is_empty() {
        return;
    }
    qb.push(" AND id NOT IN (");
    let mut ids = qb.separated(", ");
    for id in exclude {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
}

/// Releases repository for database operations
pub struct ReleaseRepository {
    pool: MySqlPool,
}

impl ReleaseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

#[async_trait]
impl ReleaseStore for ReleaseRepository {
    async fn fetch_pending(&self, limit: u32, exclude: &[i64]) -> Result<Vec<ReleaseRow>> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT id, releasename FROM releases");
        qb.push(PENDING_FILTER);
        push_exclusions(&mut qb, exclude);
        qb.push(" ORDER BY id DESC LIMIT ");
        qb.push_bind(limit);

        let rows = qb.build_query_as::<ReleaseRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn count_pending(&self, exclude: &[i64]) -> Result<i64> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM releases");
        qb.push(PENDING_FILTER);
        push_exclusions(&mut qb, exclude);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn update_url(&self, id: i64, url: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE releases SET url = ? WHERE id = ?")
            .bind(url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn statistics(&self) -> Result<ReleaseStats> {
        let total = self
            .count("SELECT COUNT(*) FROM releases WHERE releasename LIKE '%.XXX.%'")
            .await?;
        let with_url = self
            .count(
                "SELECT COUNT(*) FROM releases WHERE releasename LIKE '%.XXX.%' \
                 AND url IS NOT NULL AND url != ''",
            )
            .await?;
        let without_url = self
            .count(
                "SELECT COUNT(*) FROM releases WHERE releasename LIKE '%.XXX.%' \
                 AND (url IS NULL OR url = '')",
            )
            .await?;

        Ok(ReleaseStats {
            total,
            with_url,
            without_url,
        })
    }
}
