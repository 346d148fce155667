//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

pub mod query;
pub mod status;
pub mod sync;

/// kgvec - knowledge graph to vector index synchronization
#[derive(Parser)]
#[command(name = "kgvec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (defaults to ./kgvec.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed new and changed graph entities into the collection
    Sync(sync::SyncArgs),

    /// Show resolved configuration and collection size
    Status,

    /// Print the SPARQL query used to read the graph
    Query,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Sync(args) => sync::execute(args, config).await,
            Commands::Status => status::execute(&config).await,
            Commands::Query => query::execute(&config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_flags_and_globals_parse() {
        let cli = Cli::try_parse_from([
            "kgvec",
            "sync",
            "--batch-size",
            "50",
            "--collection",
            "staging",
            "--no-progress",
            "--verbose",
            "--config",
            "other.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.batch_size, Some(50));
                assert_eq!(args.collection.as_deref(), Some("staging"));
                assert!(args.no_progress);
                assert!(args.model.is_none());
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_batch_size() {
        assert!(Cli::try_parse_from(["kgvec", "sync", "--batch-size", "many"]).is_err());
    }
}
