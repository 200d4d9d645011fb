//! Serialization support for learned Q-tables.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    catalog::ActionCatalog,
    error::Error,
    q_learning::q_table::{Hyperparameters, QTable},
    types::StateKey,
};

/// Persisted form of a [`QTable`].
///
/// Rows are keyed by the canonical state string and hold one estimate per
/// entry of `actions`, the catalog identifiers the table was learned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub actions: Vec<String>,
    pub hyperparameters: Hyperparameters,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    pub rows: BTreeMap<String, Vec<f64>>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &QTable, catalog: &ActionCatalog) -> Self {
        Self {
            version: Self::VERSION,
            actions: catalog.identifiers(),
            hyperparameters: table.hyperparameters(),
            rng_seed: table.rng_seed(),
            rows: table
                .rows()
                .map(|(key, row)| (key.as_str().to_string(), row.to_vec()))
                .collect(),
        }
    }

    /// Number of stored rows.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Rebuild a live table, checking it matches `catalog`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedVersion`] for an unknown format version
    /// - [`Error::CatalogMismatch`] if the stored action identifiers differ
    /// - [`Error::RowWidthMismatch`] if any row has the wrong number of estimates
    pub fn into_table(self, catalog: &ActionCatalog) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let expected = catalog.identifiers();
        if self.actions != expected {
            return Err(Error::CatalogMismatch {
                expected,
                found: self.actions,
            });
        }
        self.hyperparameters.validate()?;

        let width = catalog.len();
        let mut rows = HashMap::with_capacity(self.rows.len());
        for (key, row) in self.rows {
            if row.len() != width {
                return Err(Error::RowWidthMismatch {
                    state: key,
                    expected: width,
                    found: row.len(),
                });
            }
            rows.insert(StateKey::parse(&key), row);
        }

        Ok(QTable::from_rows(
            width,
            self.hyperparameters,
            rows,
            self.rng_seed,
        ))
    }
}
