//! Batch jobs driven by the CLI

pub mod shutdown;
pub mod url_updater;

pub use shutdown::{sleep_or_cancel, spawn_signal_listener};
pub use url_updater::{BatchSummary, UpdaterSettings, UpdaterStatistics, UrlUpdater, log_statistics};
