//! nanos - service bootstrap and lifecycle container
//!
//! Main entry point for the nanos CLI.

mod cli;
mod register;
mod server;
mod services;

use std::path::Path;

use clap::Parser;

use nanos_config::{Config, ConfigError, ConfigLoader};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG};
use crate::register::{builtin_factory, spec_store};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let explicit = cli.config.as_path() != Path::new(DEFAULT_CONFIG);
    let config = load_config(&cli.config, explicit)?;

    match cli.command {
        None | Some(Commands::Run) => {
            init_tracing(&config.logging)?;
            run_server(config).await
        }
        Some(Commands::Services { format }) => list_services(&config, &format),
        Some(Commands::Implementations) => list_implementations(),
    }
}

/// Load the config file. Only the implicit default path may be missing.
fn load_config(path: &Path, explicit: bool) -> Result<Config, ConfigError> {
    if explicit {
        ConfigLoader::load(path)
    } else {
        ConfigLoader::load_or_default(path)
    }
}

/// List declared services and whether each implementation resolves.
fn list_services(config: &Config, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    use nanos_core::SpecificationStore;

    let factory = builtin_factory()?;
    let specs = spec_store(config).specs();

    if specs.is_empty() {
        println!("No services declared.");
        return Ok(());
    }

    match format {
        "json" => {
            let rows: Vec<_> = specs
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name(),
                        "implementation": s.implementation(),
                        "resolves": factory.contains(s.implementation()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            println!("{:<20} {:<36} {}", "NAME", "IMPLEMENTATION", "RESOLVES");
            println!("{}", "-".repeat(66));
            for spec in &specs {
                let resolves = if factory.contains(spec.implementation()) {
                    "yes"
                } else {
                    "no"
                };
                println!("{:<20} {:<36} {}", spec.name(), spec.implementation(), resolves);
            }
        }
    }

    Ok(())
}

fn list_implementations() -> Result<(), Box<dyn std::error::Error>> {
    for id in builtin_factory()?.implementations() {
        println!("{}", id);
    }
    Ok(())
}
