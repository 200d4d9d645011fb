//! Export command - Dump a saved table as CSV or JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::MsgPackRepository,
    export::{TableExporter, TableFormat},
    ports::TableRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Export a saved Q-table")]
pub struct ExportArgs {
    /// Saved table (MessagePack)
    pub table: PathBuf,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format, one row per state
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl From<ExportFormat> for TableFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => TableFormat::Csv,
            ExportFormat::Json => TableFormat::Json,
        }
    }
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = MsgPackRepository::new()
        .load(&args.table)
        .with_context(|| format!("Failed to load table from {}", args.table.display()))?;

    TableExporter::export(&saved, &args.output, args.format.into())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Exported {} states to {}",
        saved.size(),
        args.output.display()
    );
    Ok(())
}
