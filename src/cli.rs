//! CLI definitions for nanos.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Config path used when `--config` is not given.
pub(crate) const DEFAULT_CONFIG: &str = "config/default.toml";

/// nanos CLI.
#[derive(Parser)]
#[command(name = "nanos")]
#[command(about = "Service bootstrap and lifecycle container")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Boot all declared services and run until Ctrl-C (default)
    Run,

    /// List declared services and whether their implementation resolves
    Services {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List built-in implementation identifiers
    Implementations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["nanos"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn test_services_with_format() {
        let cli = Cli::parse_from(["nanos", "--config", "x.toml", "services", "--format", "json"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Some(Commands::Services { ref format }) if format == "json"));
    }
}
