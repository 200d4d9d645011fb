//! Configuration types for controller creation.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, q_learning::Hyperparameters};

/// Configuration for creating an action executor.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
///
/// # Examples
///
/// ```
/// use sparse_agent::app::ControllerConfig;
///
/// let config = ControllerConfig::new()
///     .with_seed(42)
///     .with_epsilon(0.95)
///     .with_table_path("sparse_agent_data.msgpack");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Learning rate, discount factor and greedy probability
    pub hyperparameters: Hyperparameters,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Table file to resume from and export to at each episode end
    pub table_path: Option<PathBuf>,
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.hyperparameters.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.hyperparameters.discount_factor = discount_factor;
        self
    }

    /// Set the probability of exploiting the current estimates.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.hyperparameters.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.hyperparameters.validate()
    }

    /// Read and validate a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
