//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// MessagePack-based table repository.
///
/// The table is encoded in full before the file is opened, so an encoding
/// failure never truncates an existing file.
///
/// # Examples
///
/// ```no_run
/// use sparse_agent::adapters::MsgPackRepository;
/// use sparse_agent::catalog::ActionCatalog;
/// use sparse_agent::ports::TableRepository;
/// use sparse_agent::q_learning::{Hyperparameters, QTable, SavedQTable};
/// use std::path::Path;
///
/// let catalog = ActionCatalog::standard();
/// let table = QTable::new(catalog.len(), Hyperparameters::default());
///
/// let repo = MsgPackRepository::new();
/// repo.save(&SavedQTable::from_table(&table, &catalog), Path::new("table.msgpack"))?;
/// let loaded = repo.load(Path::new("table.msgpack"))?;
/// # Ok::<(), sparse_agent::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|source| Error::Io {
                operation: format!("write file {path:?}"),
                source,
            })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
