#![deny(missing_docs)]

//! # Canon CLI
//!
//! Command Line Interface for the contract canonicalization pipeline.
//!
//! Supported Commands:
//! - `normalize`: Contract -> canonical model (JSON).
//! - `inspect`: Contract -> per-request shape and constructor summary.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod contract_file;
mod error;
mod inspect;
mod normalize;

#[derive(Parser, Debug)]
#[clap(author, version, about = "REST contract canonicalizer")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline and emit the canonical model.
    Normalize(normalize::NormalizeArgs),
    /// Summarize request shapes and constructor arguments.
    Inspect(inspect::InspectArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "canon=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Normalize(args) => normalize::execute(args)?,
        Commands::Inspect(args) => inspect::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_normalize_flags() {
        let cli = Cli::try_parse_from([
            "canon",
            "normalize",
            "--contract",
            "contract.json",
            "--generate-internal",
        ])
        .unwrap();
        match cli.command {
            Commands::Normalize(args) => {
                assert!(args.generate_internal);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_inspect_format() {
        let cli = Cli::try_parse_from([
            "canon",
            "inspect",
            "--contract",
            "contract.yaml",
            "--format",
            "yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Inspect(args) => assert_eq!(args.format, inspect::InspectFormat::Yaml),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
