//! Dependency injection container for the controller application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for creating executors and tables.

use std::{path::Path, sync::Arc};

use tracing::info;

use super::config::ControllerConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    catalog::ActionCatalog,
    executor::ActionExecutor,
    ports::TableRepository,
    q_learning::{QTable, SavedQTable},
    spatial::TargetResolver,
};

/// Resolver seeds are offset from the table seed so the two streams differ.
const RESOLVER_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use sparse_agent::app::{App, ControllerConfig};
///
/// let app = App::new();
/// let executor = app.create_executor(&ControllerConfig::new().with_seed(42))?;
/// assert_eq!(executor.table().size(), 0);
/// # Ok::<(), sparse_agent::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use sparse_agent::app::App;
/// use sparse_agent::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for table persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    /// Create an executor with the standard catalog.
    ///
    /// When `config.table_path` names an existing table it is resumed,
    /// otherwise learning starts from an empty table. Either way the table
    /// is exported back to that path at the end of every episode.
    ///
    /// # Errors
    ///
    /// Fails on invalid hyperparameters or when the stored table cannot be
    /// loaded or does not match the catalog.
    pub fn create_executor(&self, config: &ControllerConfig) -> Result<ActionExecutor> {
        config.validate()?;
        let catalog = ActionCatalog::standard();
        let seed = config.seed.or(self.default_seed);

        let table = match &config.table_path {
            Some(path) if self.table_repository.exists(path) => {
                let mut saved = self.table_repository.load(path)?;
                saved.hyperparameters = config.hyperparameters;
                saved.rng_seed = seed;
                let table = saved.into_table(&catalog)?;
                info!(path = ?path, rows = table.size(), "resumed Q-table");
                table
            }
            _ => new_table(catalog.len(), config, seed),
        };

        let resolver = TargetResolver::new(seed.map(|s| s ^ RESOLVER_SEED_OFFSET));
        let executor = ActionExecutor::new(catalog, table, resolver)?;

        Ok(match &config.table_path {
            Some(path) => executor.with_export(self.table_repository(), path.clone()),
            None => executor,
        })
    }

    /// Load a table for the standard catalog from persistent storage.
    pub fn load_table(&self, path: &Path) -> Result<QTable> {
        self.table_repository
            .load(path)?
            .into_table(&ActionCatalog::standard())
    }

    /// Save an executor's table to persistent storage.
    pub fn save_table(&self, executor: &ActionExecutor, path: &Path) -> Result<()> {
        self.table_repository.save(&executor.saved_table(), path)
    }

    /// Write an empty table carrying `config`'s hyperparameters.
    pub fn init_table(&self, config: &ControllerConfig, path: &Path) -> Result<SavedQTable> {
        config.validate()?;
        let catalog = ActionCatalog::standard();
        let table = new_table(catalog.len(), config, config.seed.or(self.default_seed));
        let saved = SavedQTable::from_table(&table, &catalog);
        self.table_repository.save(&saved, path)?;
        Ok(saved)
    }
}

fn new_table(width: usize, config: &ControllerConfig, seed: Option<u64>) -> QTable {
    let table = QTable::new(width, config.hyperparameters);
    match seed {
        Some(seed) => table.with_seed(seed),
        None => table,
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            table_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for every executor created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
