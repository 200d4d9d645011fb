//! Init command - Write an empty table for a host to resume from

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    app::{App, ControllerConfig},
    cli::output::print_kv,
    ports::TableRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Create an empty Q-table")]
pub struct InitArgs {
    /// Where to write the table
    pub table: PathBuf,

    /// JSON controller configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed stored with the table
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overwrite an existing table
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ControllerConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ControllerConfig::new(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let app = App::new();
    if app.table_repository().exists(&args.table) && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite",
            args.table.display()
        );
    }

    let saved = app
        .init_table(&config, &args.table)
        .with_context(|| format!("Failed to write {}", args.table.display()))?;

    println!("Created {}", args.table.display());
    print_kv("Actions", &saved.actions.len().to_string());
    print_kv(
        "Hyperparameters",
        &format!(
            "α={} γ={} ε={}",
            saved.hyperparameters.learning_rate,
            saved.hyperparameters.discount_factor,
            saved.hyperparameters.epsilon
        ),
    );
    Ok(())
}
