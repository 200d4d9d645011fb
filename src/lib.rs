//! Tabular Q-learning controller for a real-time-strategy game agent
//!
//! This crate provides:
//! - A fixed catalog of high-level actions, including grid-sampled attacks
//! - A state encoder that buckets an observation into a four-value key
//! - A Q-table with ε-greedy selection and the one-step TD update
//! - A per-tick executor expanding each chosen action into primitive commands
//!   over a four-phase decision cycle
//! - Table persistence, export, and an episode loop for host environments

pub mod adapters;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod command;
pub mod encoder;
pub mod error;
pub mod executor;
pub mod export;
pub mod observation;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod spatial;
pub mod types;

pub use catalog::{ActionCatalog, SmartAction, Structure};
pub use command::Command;
pub use error::{Error, Result};
pub use executor::ActionExecutor;
pub use observation::Observation;
pub use q_learning::{Hyperparameters, QTable};
pub use types::{ActionIndex, Point, StateKey};
