//! Observer implementations for watching the controller learn
//!
//! Observers allow composable data collection during play without coupling
//! the executor to specific output formats.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    Result,
    ports::ControllerObserver,
    q_learning::TdUpdate,
    types::{ActionIndex, StateKey},
};

/// Tracing observer - Emits one structured event per controller event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ControllerObserver for TracingObserver {
    fn on_episode_start(&mut self) -> Result<()> {
        debug!("episode start");
        Ok(())
    }

    fn on_decision(&mut self, state: &StateKey, action: ActionIndex) -> Result<()> {
        trace!(%state, action = action.value(), "decision");
        Ok(())
    }

    fn on_update(&mut self, update: &TdUpdate) -> Result<()> {
        trace!(
            state = %update.state,
            action = update.action.value(),
            reward = update.reward,
            next_state = %update.next_state,
            previous = update.previous,
            updated = update.updated,
            "td update"
        );
        Ok(())
    }

    fn on_episode_end(&mut self, reward: f64, table_size: usize) -> Result<()> {
        info!(reward, table_size, "episode end");
        Ok(())
    }
}

/// Metrics observer - Tracks episode outcomes and learning activity
///
/// Outcomes are classified by the sign of the terminal reward. Clones share
/// the same counters, so a handle kept by the caller sees what the executor's
/// boxed copy records.
#[derive(Debug, Default, Clone)]
pub struct MetricsObserver {
    counters: Arc<Mutex<MetricsCounters>>,
}

#[derive(Debug, Default)]
struct MetricsCounters {
    episodes: usize,
    wins: usize,
    ties: usize,
    losses: usize,
    decisions: usize,
    updates: usize,
    total_reward: f64,
    table_size: usize,
}

impl MetricsCounters {
    fn rate(&self, count: usize) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            count as f64 / self.episodes as f64
        }
    }
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self) -> MutexGuard<'_, MetricsCounters> {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        let counters = self.counters();
        counters.rate(counters.wins)
    }

    /// Get current tie rate
    pub fn tie_rate(&self) -> f64 {
        let counters = self.counters();
        counters.rate(counters.ties)
    }

    /// Get current loss rate
    pub fn loss_rate(&self) -> f64 {
        let counters = self.counters();
        counters.rate(counters.losses)
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let c = self.counters();
        MetricsSummary {
            episodes: c.episodes,
            wins: c.wins,
            ties: c.ties,
            losses: c.losses,
            win_rate: c.rate(c.wins),
            tie_rate: c.rate(c.ties),
            loss_rate: c.rate(c.losses),
            decisions: c.decisions,
            updates: c.updates,
            mean_reward: if c.episodes == 0 {
                0.0
            } else {
                c.total_reward / c.episodes as f64
            },
            table_size: c.table_size,
        }
    }
}

impl ControllerObserver for MetricsObserver {
    fn on_decision(&mut self, _state: &StateKey, _action: ActionIndex) -> Result<()> {
        self.counters().decisions += 1;
        Ok(())
    }

    fn on_update(&mut self, _update: &TdUpdate) -> Result<()> {
        self.counters().updates += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, reward: f64, table_size: usize) -> Result<()> {
        let mut c = self.counters();
        c.episodes += 1;
        c.total_reward += reward;
        c.table_size = table_size;
        if reward > 0.0 {
            c.wins += 1;
        } else if reward < 0.0 {
            c.losses += 1;
        } else {
            c.ties += 1;
        }
        Ok(())
    }
}

/// Summary of controller metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub ties: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub tie_rate: f64,
    pub loss_rate: f64,
    pub decisions: usize,
    pub updates: usize,
    pub mean_reward: f64,
    pub table_size: usize,
}

/// One recorded controller event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    EpisodeStart,
    Decision { state: StateKey, action: ActionIndex },
    Update(TdUpdate),
    EpisodeEnd { reward: f64, table_size: usize },
}

/// Recording observer - Keeps every event in memory
///
/// Clones share the same log, so a caller can keep one handle while the
/// executor owns the boxed observer.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ControllerEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<ControllerEvent> {
        self.log().clone()
    }

    /// Recorded TD updates only, in order.
    pub fn updates(&self) -> Vec<TdUpdate> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                ControllerEvent::Update(update) => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> MutexGuard<'_, Vec<ControllerEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: ControllerEvent) -> Result<()> {
        self.log().push(event);
        Ok(())
    }
}

impl ControllerObserver for RecordingObserver {
    fn on_episode_start(&mut self) -> Result<()> {
        self.record(ControllerEvent::EpisodeStart)
    }

    fn on_decision(&mut self, state: &StateKey, action: ActionIndex) -> Result<()> {
        self.record(ControllerEvent::Decision {
            state: state.clone(),
            action,
        })
    }

    fn on_update(&mut self, update: &TdUpdate) -> Result<()> {
        self.record(ControllerEvent::Update(update.clone()))
    }

    fn on_episode_end(&mut self, reward: f64, table_size: usize) -> Result<()> {
        self.record(ControllerEvent::EpisodeEnd { reward, table_size })
    }
}
