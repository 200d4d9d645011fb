//! Tabular Q-learning
//!
//! The table maps each encoded state key to one estimate per catalog action
//! and learns with the off-policy TD rule
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! where the bootstrap term is dropped for the terminal pseudo-state.
//! Actions are chosen ε-greedily; note that here ε is the probability of
//! *exploiting*, so the default ε = 0.9 explores one decision in ten.
//!
//! ## Usage Example
//!
//! ```
//! use sparse_agent::q_learning::{Hyperparameters, QTable};
//! use sparse_agent::types::StateKey;
//!
//! let mut table = QTable::new(11, Hyperparameters::default()).with_seed(42);
//! let state = StateKey::parse("[1,0,0,0]");
//! let action = table.select_action(&state);
//! table.update(&state, action, 1.0, &StateKey::terminal())?;
//! # Ok::<(), sparse_agent::Error>(())
//! ```

pub mod q_table;
pub mod serialization;

// Public re-exports
pub use q_table::{Hyperparameters, QTable, TdUpdate};
pub use serialization::SavedQTable;
