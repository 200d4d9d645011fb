//! Catalog command - List every action the controller can choose

use anyhow::Result;
use clap::Parser;

use crate::{catalog::ActionCatalog, cli::output::print_section};

#[derive(Parser, Debug)]
#[command(about = "List the action catalog")]
pub struct CatalogArgs {
    /// Print identifiers only, one per line
    #[arg(long)]
    pub plain: bool,
}

pub fn execute(args: CatalogArgs) -> Result<()> {
    let catalog = ActionCatalog::standard();

    if args.plain {
        for (_, action) in catalog.iter() {
            println!("{action}");
        }
        return Ok(());
    }

    print_section(&format!("Action catalog ({} actions)", catalog.len()));
    println!("  {:>5}  {:<20} {:<8} offset", "index", "identifier", "kind");
    for (index, action) in catalog.iter() {
        println!(
            "  {:>5}  {:<20} {:<8} {}",
            index.value(),
            action.to_string(),
            action.kind(),
            action.offset()
        );
    }
    Ok(())
}
