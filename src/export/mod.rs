//! Export functionality for analysis
//!
//! Learned tables can be dumped to CSV for spreadsheets or pretty JSON for
//! scripts, and summarised as a greedy policy listing.

mod table_csv;

pub use table_csv::{PolicyRow, TableExporter, TableFormat};
