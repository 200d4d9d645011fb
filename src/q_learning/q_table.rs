//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    types::{ActionIndex, StateKey},
};

/// Learning hyperparameters.
///
/// `epsilon` is the probability of *exploiting* the current estimates; the
/// remaining `1 - epsilon` picks an action uniformly at random.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Greedy-selection probability ε
    pub epsilon: f64,
}

impl Hyperparameters {
    /// Check every parameter is finite and within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("epsilon", self.epsilon),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            discount_factor: 0.9,
            epsilon: 0.9,
        }
    }
}

/// Record of one applied TD update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdUpdate {
    pub state: StateKey,
    pub action: ActionIndex,
    pub reward: f64,
    pub next_state: StateKey,
    /// Estimate before the update
    pub previous: f64,
    /// TD target the estimate moved toward
    pub target: f64,
    /// Estimate after the update
    pub updated: f64,
}

/// Q-table mapping state keys to one estimate per catalog action.
///
/// Rows are created zero-filled on first sight and never removed.
#[derive(Debug, Clone)]
pub struct QTable {
    rows: HashMap<StateKey, Vec<f64>>,
    width: usize,
    params: Hyperparameters,
    rng: StdRng,
    rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

impl QTable {
    /// Create an empty table whose rows hold `width` estimates.
    pub fn new(width: usize, params: Hyperparameters) -> Self {
        debug_assert!(width > 0, "Q-table rows need at least one action");
        Self {
            rows: HashMap::new(),
            width,
            params,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub(crate) fn from_rows(
        width: usize,
        params: Hyperparameters,
        rows: HashMap<StateKey, Vec<f64>>,
        rng_seed: Option<u64>,
    ) -> Self {
        Self {
            rows,
            width,
            params,
            rng: build_rng(rng_seed),
            rng_seed,
        }
    }

    /// Number of estimates per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (distinct state keys seen).
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.params
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.rows.contains_key(state)
    }

    pub fn row(&self, state: &StateKey) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&StateKey, &[f64])> {
        self.rows.iter().map(|(key, row)| (key, row.as_slice()))
    }

    /// Estimate for a state-action pair, 0.0 for unseen states.
    pub fn get(&self, state: &StateKey, action: ActionIndex) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action.value()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Overwrite one estimate, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] when `action` is outside the row.
    pub fn set(&mut self, state: StateKey, action: ActionIndex, value: f64) -> Result<()> {
        let width = self.width;
        self.check_action(action)?;
        self.rows.entry(state).or_insert_with(|| vec![0.0; width])[action.value()] = value;
        Ok(())
    }

    /// Make sure a zero-filled row exists for `state`.
    pub fn ensure_row(&mut self, state: &StateKey) {
        if !self.rows.contains_key(state) {
            self.rows.insert(state.clone(), vec![0.0; self.width]);
        }
    }

    /// Maximum estimate in a row, 0.0 for unseen states.
    pub fn max_q(&self, state: &StateKey) -> f64 {
        self.rows
            .get(state)
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0)
    }

    /// Highest-valued action, ties broken uniformly at random.
    ///
    /// Candidates are shuffled before the first maximum is taken, so every
    /// tied action is equally likely.
    pub fn greedy_action(&mut self, state: &StateKey) -> ActionIndex {
        self.ensure_row(state);
        let row = &self.rows[state];

        let mut order: Vec<usize> = (0..self.width).collect();
        order.shuffle(&mut self.rng);

        let best = order
            .into_iter()
            .fold(None::<(usize, f64)>, |best, action| match best {
                Some((_, value)) if value >= row[action] => best,
                _ => Some((action, row[action])),
            })
            .map(|(action, _)| action)
            .unwrap_or(0);

        ActionIndex::new(best)
    }

    /// ε-greedy action selection
    ///
    /// With probability ε exploits via [`QTable::greedy_action`], otherwise
    /// picks uniformly over the whole catalog.
    pub fn select_action(&mut self, state: &StateKey) -> ActionIndex {
        self.ensure_row(state);
        if self.rng.random::<f64>() < self.params.epsilon {
            self.greedy_action(state)
        } else {
            ActionIndex::new(self.rng.random_range(0..self.width))
        }
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)], with the
    /// bootstrap term dropped when `next_state` is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] when `action` is outside the row.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: ActionIndex,
        reward: f64,
        next_state: &StateKey,
    ) -> Result<TdUpdate> {
        self.check_action(action)?;
        self.ensure_row(next_state);

        let target = if next_state.is_terminal() {
            reward
        } else {
            reward + self.params.discount_factor * self.max_q(next_state)
        };

        let (width, learning_rate) = (self.width, self.params.learning_rate);
        let estimate = &mut self
            .rows
            .entry(state.clone())
            .or_insert_with(|| vec![0.0; width])[action.value()];
        let previous = *estimate;
        *estimate += learning_rate * (target - previous);

        Ok(TdUpdate {
            state: state.clone(),
            action,
            reward,
            next_state: next_state.clone(),
            previous,
            target,
            updated: *estimate,
        })
    }

    fn check_action(&self, action: ActionIndex) -> Result<()> {
        if action.value() < self.width {
            Ok(())
        } else {
            Err(Error::UnknownAction {
                index: action.value(),
                catalog_size: self.width,
            })
        }
    }
}
