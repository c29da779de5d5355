//! PreDB updater - resolves scene release names to ThePornDB scene URLs
//!
//! The binary polls the releases table, resolves each pending release name
//! against the catalog, and writes the matched scene URL back.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod services;
