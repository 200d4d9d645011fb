//! Inspect command - Summarise a saved table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    export::TableExporter,
    ports::TableRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Summarise a saved Q-table")]
pub struct InspectArgs {
    /// Saved table (MessagePack)
    pub table: PathBuf,

    /// Number of states to list, best greedy estimate first
    #[arg(long, short = 'n', default_value_t = 10)]
    pub top: usize,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = MsgPackRepository::new()
        .load(&args.table)
        .with_context(|| format!("Failed to load table from {}", args.table.display()))?;

    print_section(&format!("Q-table {}", args.table.display()));
    print_kv("Version", &saved.version.to_string());
    print_kv("Actions", &saved.actions.len().to_string());
    print_kv("States", &format_number(saved.size()));
    print_kv(
        "Learning rate",
        &saved.hyperparameters.learning_rate.to_string(),
    );
    print_kv(
        "Discount factor",
        &saved.hyperparameters.discount_factor.to_string(),
    );
    print_kv("Epsilon", &saved.hyperparameters.epsilon.to_string());
    if let Some(seed) = saved.rng_seed {
        print_kv("Seed", &seed.to_string());
    }

    let policy = TableExporter::policy(&saved);
    if policy.is_empty() {
        return Ok(());
    }

    print_subsection(&format!(
        "Greedy policy (top {} of {})",
        args.top.min(policy.len()),
        policy.len()
    ));
    for row in policy.iter().take(args.top) {
        println!("  {:<20} {:<20} {:>10.4}", row.state, row.action, row.value);
    }
    Ok(())
}
