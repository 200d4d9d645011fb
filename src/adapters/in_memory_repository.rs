//! In-memory table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of TableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// Tables are stored as MessagePack bytes so the serialization path is still
/// exercised. All clones share the same storage, which lets a test keep a
/// handle while the executor owns another.
///
/// # Examples
///
/// ```
/// use sparse_agent::adapters::InMemoryRepository;
/// use sparse_agent::catalog::ActionCatalog;
/// use sparse_agent::ports::TableRepository;
/// use sparse_agent::q_learning::{Hyperparameters, QTable, SavedQTable};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let catalog = ActionCatalog::standard();
/// let table = QTable::new(catalog.len(), Hyperparameters::default());
///
/// repo.save(&SavedQTable::from_table(&table, &catalog), Path::new("table"))?;
/// let loaded = repo.load(Path::new("table"))?;
/// assert_eq!(loaded.size(), 0);
/// # Ok::<(), sparse_agent::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_saves: Arc<Mutex<bool>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail, to exercise export error paths.
    pub fn failing() -> Self {
        let repo = Self::new();
        repo.set_fail_saves(true);
        repo
    }

    pub fn set_fail_saves(&self, fail: bool) {
        *lock(&self.fail_saves) = fail;
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        lock(&self.storage).len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        lock(&self.storage).clear();
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        lock(&self.storage).contains_key(&key(path))
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Lock a mutex, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TableRepository for InMemoryRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        if *lock(&self.fail_saves) {
            return Err(Error::Io {
                operation: format!("save table to in-memory storage at {path:?}"),
                source: std::io::Error::other("in-memory repository set to fail"),
            });
        }

        let bytes = rmp_serde::to_vec_named(table).map_err(|e| Error::SerializationContext {
            operation: "serialize table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        lock(&self.storage).insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let storage = lock(&self.storage);

        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::ActionCatalog,
        q_learning::{Hyperparameters, QTable},
    };

    fn empty_table() -> SavedQTable {
        let catalog = ActionCatalog::standard();
        SavedQTable::from_table(
            &QTable::new(catalog.len(), Hyperparameters::default()),
            &catalog,
        )
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("table");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&empty_table(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.exists(path));

        assert_eq!(repo.load(path).unwrap(), empty_table());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&empty_table(), Path::new("shared")).unwrap();
        assert!(repo2.load(Path::new("shared")).is_ok());
        assert_eq!(repo2.count(), 1);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }

    #[test]
    fn test_failing_repository_rejects_saves() {
        let repo = InMemoryRepository::failing();
        assert!(repo.save(&empty_table(), Path::new("t")).is_err());
        assert_eq!(repo.count(), 0);

        repo.set_fail_saves(false);
        assert!(repo.save(&empty_table(), Path::new("t")).is_ok());
    }
}
