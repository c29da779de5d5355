//! Command line parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "predb-updater")]
#[command(about = "Resolve scene release names to ThePornDB URLs", long_about = None)]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, global = true, env = "PREDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Resolve without writing to the database or persisting learned names
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Poll for pending releases until interrupted (default)
    Run,
    /// Print database and checkpoint statistics
    Stats,
    /// Forget every checkpointed release
    Reset,
    /// Re-run releases whose last outcome was a failure
    RetryFailed {
        #[arg(long, default_value_t = 50)]
        max: usize,
    },
    /// Keep only the most recent checkpoint entries
    Cleanup {
        #[arg(long, default_value_t = 50_000)]
        keep: usize,
    },
    /// Resolve a single release name and print the outcome
    Resolve {
        release_name: String,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["predb-updater"]).unwrap();
        assert_eq!(cli.command(), Command::Run);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from(["predb-updater", "retry-failed", "--max", "5", "--dry-run"]).unwrap();
        assert_eq!(cli.command(), Command::RetryFailed { max: 5 });
        assert!(cli.dry_run);

        let cli = Cli::try_parse_from(["predb-updater", "cleanup"]).unwrap();
        assert_eq!(cli.command(), Command::Cleanup { keep: 50_000 });

        let cli = Cli::try_parse_from(["predb-updater", "resolve", "Studio.24.01.02.Jane.XXX"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Resolve {
                release_name: "Studio.24.01.02.Jane.XXX".into()
            }
        );
    }
}
