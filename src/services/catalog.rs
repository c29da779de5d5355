//! External scene catalog seam
//!
//! The resolver only ever talks to the catalog through [SceneSearch]; the
//! HTTP implementation lives in [tpdb](super::tpdb) and tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scene returned by the external catalog. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub site_name: String,
    /// Unique, in catalog order
    pub performer_names: Vec<String>,
    pub tags: Vec<String>,
    pub duration: Option<u64>,
}

/// Typed failure of a single catalog search.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchFailure {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl SearchFailure {
    /// 404 means "nothing here" rather than a transient failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchFailure::Http { status: 404 })
    }
}

/// Free-text scene search against the external catalog.
#[async_trait]
pub trait SceneSearch: Send + Sync {
    /// Short name for logs ("tpdb", "fake", ...)
    fn name(&self) -> &str;

    async fn search(&self, query: &str, token: &str) -> Result<Vec<CandidateRecord>, SearchFailure>;
}
