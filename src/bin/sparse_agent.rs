//! sparse-agent CLI - Tools for the tabular Q-learning RTS controller
//!
//! This CLI provides:
//! - A listing of the discrete action catalog
//! - Creation of empty tables for a host to resume from
//! - Inspection and export of learned tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sparse-agent")]
#[command(version, about = "Tabular Q-learning controller for an RTS agent", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every action in the catalog
    Catalog(sparse_agent::cli::commands::catalog::CatalogArgs),

    /// Create an empty Q-table
    Init(sparse_agent::cli::commands::init::InitArgs),

    /// Summarise a saved Q-table
    Inspect(sparse_agent::cli::commands::inspect::InspectArgs),

    /// Export a saved Q-table as CSV or JSON
    Export(sparse_agent::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Catalog(args) => sparse_agent::cli::commands::catalog::execute(args),
        Commands::Init(args) => sparse_agent::cli::commands::init::execute(args),
        Commands::Inspect(args) => sparse_agent::cli::commands::inspect::execute(args),
        Commands::Export(args) => sparse_agent::cli::commands::export::execute(args),
    }
}
