//! CSV and JSON export of learned Q-tables
//!
//! CSV rows hold one state each: the state key followed by one estimate per
//! catalog action, with the action identifiers as the header.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, q_learning::SavedQTable};

/// Output format for table exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Json,
}

/// Greedy choice for one stored state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRow {
    pub state: String,
    pub action: String,
    pub value: f64,
}

/// Exporter for saved Q-tables
pub struct TableExporter;

impl TableExporter {
    /// Write `table` to `path` in `format`.
    pub fn export(table: &SavedQTable, path: &Path, format: TableFormat) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create export file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        match format {
            TableFormat::Csv => Self::write_csv(table, &mut writer)?,
            TableFormat::Json => Self::write_json(table, &mut writer)?,
        }

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush export file {path:?}"),
            source,
        })
    }

    /// Header `state,<identifier>...`, then one row per state in key order.
    pub fn write_csv<W: Write>(table: &SavedQTable, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(table.actions.len() + 1);
        header.push("state");
        header.extend(table.actions.iter().map(String::as_str));
        csv.write_record(&header)?;

        for (state, row) in &table.rows {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(state.clone());
            record.extend(row.iter().map(|value| value.to_string()));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(table: &SavedQTable, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, table)?;
        Ok(())
    }

    /// Greedy action for every stored state, best estimates first.
    ///
    /// Ties resolve to the lowest action index so the listing is stable.
    pub fn policy(table: &SavedQTable) -> Vec<PolicyRow> {
        let mut rows: Vec<PolicyRow> = table
            .rows
            .iter()
            .filter_map(|(state, row)| {
                let (index, value) = row
                    .iter()
                    .copied()
                    .enumerate()
                    .fold(None::<(usize, f64)>, |best, (i, v)| match best {
                        Some((_, b)) if b >= v => best,
                        _ => Some((i, v)),
                    })?;
                Some(PolicyRow {
                    state: state.clone(),
                    action: table.actions.get(index)?.clone(),
                    value,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.state.cmp(&b.state)));
        rows
    }
}
