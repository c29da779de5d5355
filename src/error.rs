//! Error types shared across the updater

use std::path::PathBuf;

use thiserror::Error;

/// Failure persisting or reading a JSON document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that abort a run (or a single item's persistence step).
#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error("no ThePornDB API key configured (set tpdb_api_key in config.toml or TPDB_API_KEY)")]
    CredentialMissing,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
