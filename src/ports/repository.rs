//! Repository port for Q-table persistence.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for storing and reloading learned tables.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Default logical name the table is exported under at episode end.
pub const DEFAULT_TABLE_FILE: &str = "sparse_agent_data.msgpack";

/// Port for persisting and loading learned Q-tables.
///
/// # Examples
///
/// ```no_run
/// use sparse_agent::ports::TableRepository;
/// use sparse_agent::q_learning::SavedQTable;
/// use std::path::Path;
///
/// fn backup<R: TableRepository>(repo: &R, table: &SavedQTable) -> sparse_agent::Result<()> {
///     repo.save(table, Path::new("backup.msgpack"))
/// }
/// ```
pub trait TableRepository {
    /// Save a table to persistent storage.
    ///
    /// Implementations must not require mutable access to the live table;
    /// a failed save leaves the in-memory table untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, cannot be read, or is
    /// not a valid serialized table.
    fn load(&self, path: &Path) -> Result<SavedQTable>;

    /// Whether a table exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}
