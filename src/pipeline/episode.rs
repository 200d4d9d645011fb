//! Episode loop connecting an executor to a host environment

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    error::Error,
    executor::{ActionExecutor, Phase},
    ports::Environment,
};

/// Episode loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Abort an episode that has not ended after this many ticks
    pub max_ticks: Option<usize>,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            episodes: 1,
            max_ticks: None,
        }
    }
}

/// Result of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode number, starting at 1
    pub episode: usize,

    /// Observations handed to the executor, the last one included
    pub ticks: usize,

    /// Terminal reward
    pub reward: f64,

    /// Decision cycles started
    pub decisions: usize,

    /// Rows in the table after the episode
    pub table_size: usize,
}

/// Result of a multi-episode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub episodes: Vec<EpisodeSummary>,
    pub wins: usize,
    pub ties: usize,
    pub losses: usize,
    pub win_rate: f64,
}

impl RunResult {
    pub fn new(episodes: Vec<EpisodeSummary>) -> Self {
        let wins = episodes.iter().filter(|e| e.reward > 0.0).count();
        let losses = episodes.iter().filter(|e| e.reward < 0.0).count();
        let ties = episodes.len() - wins - losses;
        let win_rate = if episodes.is_empty() {
            0.0
        } else {
            wins as f64 / episodes.len() as f64
        };

        Self {
            episodes,
            wins,
            ties,
            losses,
            win_rate,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives an [`ActionExecutor`] against an [`Environment`]
pub struct EpisodeRunner {
    config: EpisodeConfig,
}

impl EpisodeRunner {
    pub fn new(config: EpisodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Run every configured episode in sequence.
    ///
    /// Learning carries over between episodes because the executor, and so
    /// its table, is shared.
    pub fn run(
        &self,
        executor: &mut ActionExecutor,
        env: &mut dyn Environment,
    ) -> Result<RunResult> {
        let mut episodes = Vec::with_capacity(self.config.episodes);
        for episode in 1..=self.config.episodes {
            episodes.push(self.run_episode(episode, executor, env)?);
        }

        let result = RunResult::new(episodes);
        info!(
            episodes = result.episodes.len(),
            wins = result.wins,
            ties = result.ties,
            losses = result.losses,
            "run finished"
        );
        Ok(result)
    }

    /// Play one episode until the executor has seen its last observation.
    pub fn run_episode(
        &self,
        episode: usize,
        executor: &mut ActionExecutor,
        env: &mut dyn Environment,
    ) -> Result<EpisodeSummary> {
        let mut observation = env.reset()?;
        let mut ticks = 0;
        let mut decisions = 0;

        loop {
            let starts_cycle = observation.is_first() || executor.phase() == Phase::Select;
            if starts_cycle && !observation.is_last() {
                decisions += 1;
            }
            let command = executor.step(&observation)?;
            ticks += 1;

            if observation.is_last() {
                let summary = EpisodeSummary {
                    episode,
                    ticks,
                    reward: observation.reward,
                    decisions,
                    table_size: executor.table().size(),
                };
                debug!(?summary, "episode summary");
                return Ok(summary);
            }

            if let Some(limit) = self.config.max_ticks.filter(|&limit| ticks >= limit) {
                return Err(Error::Environment {
                    message: format!("episode {episode} did not end within {limit} ticks"),
                });
            }

            observation = env.step(&command)?;
        }
    }
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self::new(EpisodeConfig::default())
    }
}
