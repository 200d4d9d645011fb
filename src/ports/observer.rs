//! Observer port - abstraction for watching the controller learn
//!
//! Observers receive decision, update and episode events from the executor
//! without coupling the decision engine to any output format.

use crate::{
    Result,
    q_learning::TdUpdate,
    types::{ActionIndex, StateKey},
};

/// Observer trait for monitoring the controller
///
/// # Event Sequence
///
/// 1. `on_episode_start()` - At the first tick of each episode
/// 2. For each decision cycle:
///    - `on_update(...)` - When the pending transition is learned from
///    - `on_decision(...)` - When a new action is chosen
/// 3. `on_update(...)` - The terminal update at the last tick
/// 4. `on_episode_end(reward, table_size)`
///
/// # Examples
///
/// ```
/// use sparse_agent::ports::ControllerObserver;
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl ControllerObserver for EpisodeCounter {
///     fn on_episode_end(&mut self, _reward: f64, _table_size: usize) -> sparse_agent::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait ControllerObserver: Send {
    /// Called on the first tick of an episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_episode_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when a new action is chosen at the start of a decision cycle.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_decision(&mut self, _state: &StateKey, _action: ActionIndex) -> Result<()> {
        Ok(())
    }

    /// Called after every TD update, including the terminal one.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_update(&mut self, _update: &TdUpdate) -> Result<()> {
        Ok(())
    }

    /// Called on the last tick, after the terminal update.
    ///
    /// # Parameters
    ///
    /// * `reward` - Terminal episode reward
    /// * `table_size` - Number of table rows after the update
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_episode_end(&mut self, _reward: f64, _table_size: usize) -> Result<()> {
        Ok(())
    }
}
