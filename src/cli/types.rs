//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::apply::ApplyArgs;
use super::commands::delete::DeleteArgs;

/// Top-level CLI surface.
#[derive(Parser)]
#[command(name = "poolctl")]
#[command(about = "Declarative reconciler for Scaleway Kapsule node pools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Converge a node pool toward the declared spec
    Apply(ApplyArgs),

    /// Remove a node pool and wait for it to disappear
    Delete(DeleteArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from([
            "poolctl",
            "delete",
            "--cluster-id",
            "c1",
            "--name",
            "workers",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Delete(_)));
    }
}
