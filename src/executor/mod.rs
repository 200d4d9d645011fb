//! Per-tick controller driving the learned policy
//!
//! The [`ActionExecutor`] is called once per environment tick. It
//! encodes the observation, runs the Q-learning update and ε-greedy choice
//! at the start of every four-tick decision cycle, and expands the chosen
//! high-level action into one primitive [`Command`] per tick.
//!
//! # Tick Flow
//!
//! ```text
//! last tick?   ──yes──> terminal update ─> reset ─> export ─> NoOp
//!    │no
//! first tick?  ──yes──> reset, detect orientation, cache CC centroid
//!    │
//! encode state
//!    │
//! phase Select ──yes──> update pending (reward 0) ─> choose action
//!    │
//! handler(action, phase) ─> command or NoOp
//!    │
//! advance phase
//! ```

pub mod handlers;
pub mod session;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, warn};

pub use session::{PendingDecision, Phase, SessionState};

use crate::{
    Result,
    catalog::ActionCatalog,
    command::Command,
    encoder::{self, StateVector},
    error::Error,
    observation::{Observation, UnitType},
    ports::{ControllerObserver, TableRepository},
    q_learning::{QTable, SavedQTable},
    spatial::{self, TargetResolver},
    types::StateKey,
};

/// Destination for the table export on each episode end.
#[derive(Clone)]
struct TableExport {
    repository: Arc<dyn TableRepository + Send + Sync>,
    path: PathBuf,
}

/// Per-tick decision loop over a fixed action catalog.
///
/// # Examples
///
/// ```
/// use sparse_agent::catalog::ActionCatalog;
/// use sparse_agent::command::Command;
/// use sparse_agent::executor::ActionExecutor;
/// use sparse_agent::observation::{Observation, StepType};
/// use sparse_agent::q_learning::{Hyperparameters, QTable};
/// use sparse_agent::spatial::TargetResolver;
///
/// let catalog = ActionCatalog::standard();
/// let table = QTable::new(catalog.len(), Hyperparameters::default()).with_seed(7);
/// let mut executor = ActionExecutor::new(catalog, table, TargetResolver::new(Some(7)))?;
///
/// let command = executor.step(&Observation::new(StepType::First))?;
/// assert!(matches!(command, Command::NoOp | Command::SelectArmy));
/// # Ok::<(), sparse_agent::Error>(())
/// ```
pub struct ActionExecutor {
    catalog: ActionCatalog,
    table: QTable,
    resolver: TargetResolver,
    session: SessionState,
    export: Option<TableExport>,
    observers: Vec<Box<dyn ControllerObserver>>,
}

impl ActionExecutor {
    /// Create an executor over `catalog` using `table` for decisions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the table width does not
    /// match the catalog size.
    pub fn new(catalog: ActionCatalog, table: QTable, resolver: TargetResolver) -> Result<Self> {
        if table.width() != catalog.len() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "Q-table has {} actions per row but the catalog has {}",
                    table.width(),
                    catalog.len()
                ),
            });
        }

        Ok(Self {
            catalog,
            table,
            resolver,
            session: SessionState::default(),
            export: None,
            observers: Vec::new(),
        })
    }

    /// Export the table through `repository` to `path` whenever an episode ends.
    pub fn with_export(
        mut self,
        repository: Arc<dyn TableRepository + Send + Sync>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.export = Some(TableExport {
            repository,
            path: path.into(),
        });
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ControllerObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Path the table is exported to, if exporting is enabled.
    pub fn export_path(&self) -> Option<&Path> {
        self.export.as_ref().map(|export| export.path.as_path())
    }

    /// Snapshot of the table in its persisted form.
    pub fn saved_table(&self) -> SavedQTable {
        SavedQTable::from_table(&self.table, &self.catalog)
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    /// Advance the controller by one tick and return the command to send.
    ///
    /// # Errors
    ///
    /// - [`Error::Persistence`] if the end-of-episode export fails; the
    ///   terminal update and session reset have already happened and the
    ///   host should send a no-op
    /// - Any error raised by an observer
    pub fn step(&mut self, observation: &Observation) -> Result<Command> {
        if observation.is_last() {
            return self.finish_episode(observation.reward);
        }

        if observation.is_first() {
            self.start_episode(observation)?;
        }

        let state = encoder::encode(observation);
        if self.session.phase == Phase::Select {
            self.decide(&state)?;
        }

        let command = match &self.session.pending {
            Some(pending) => {
                let action = self.catalog.decompose(pending.action)?;
                let mut ctx = handlers::TickContext {
                    observation,
                    state: &state,
                    session: &self.session,
                    resolver: &mut self.resolver,
                };
                handlers::dispatch(action, &mut ctx)
            }
            None => None,
        }
        .unwrap_or(Command::NoOp);

        self.session.advance();
        Ok(command)
    }

    /// Write the current table through the configured repository.
    ///
    /// Does nothing when no export target is configured.
    pub fn export_table(&self) -> Result<()> {
        let Some(export) = &self.export else {
            return Ok(());
        };

        export
            .repository
            .save(&self.saved_table(), &export.path)
            .map_err(|e| Error::Persistence {
                path: export.path.display().to_string(),
                message: e.to_string(),
            })?;
        info!(path = ?export.path, rows = self.table.size(), "exported Q-table");
        Ok(())
    }

    fn start_episode(&mut self, observation: &Observation) -> Result<()> {
        self.session.reset();
        self.session.orientation =
            spatial::detect_orientation(&observation.minimap_player_relative);
        self.session.command_center =
            spatial::centroid(&observation.screen_unit_type, UnitType::CommandCenter);

        debug!(
            orientation = ?self.session.orientation,
            command_center = ?self.session.command_center,
            "episode started"
        );
        notify(&mut self.observers, |observer| observer.on_episode_start())
    }

    fn decide(&mut self, state: &StateVector) -> Result<()> {
        let key = state.key();

        if let Some(pending) = self.session.pending.take() {
            let update = self.table.update(&pending.state, pending.action, 0.0, &key)?;
            notify(&mut self.observers, |observer| observer.on_update(&update))?;
        }

        let action = self.table.select_action(&key);
        debug!(
            state = %key,
            action = %self.catalog.decompose(action)?,
            "chose action"
        );
        notify(&mut self.observers, |observer| {
            observer.on_decision(&key, action)
        })?;

        self.session.pending = Some(PendingDecision { state: key, action });
        Ok(())
    }

    fn finish_episode(&mut self, reward: f64) -> Result<Command> {
        if let Some(pending) = self.session.pending.take() {
            let update =
                self.table
                    .update(&pending.state, pending.action, reward, &StateKey::terminal())?;
            notify(&mut self.observers, |observer| observer.on_update(&update))?;
        }

        self.session.reset();
        let exported = self.export_table();
        if let Err(e) = &exported {
            warn!(error = %e, "failed to export Q-table");
        }

        info!(reward, rows = self.table.size(), "episode finished");
        let table_size = self.table.size();
        notify(&mut self.observers, |observer| {
            observer.on_episode_end(reward, table_size)
        })?;

        exported.map(|()| Command::NoOp)
    }
}

fn notify(
    observers: &mut [Box<dyn ControllerObserver>],
    mut event: impl FnMut(&mut dyn ControllerObserver) -> Result<()>,
) -> Result<()> {
    for observer in observers.iter_mut() {
        event(observer.as_mut())?;
    }
    Ok(())
}
