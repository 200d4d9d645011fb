//! Environment port - the host game the controller plays
//!
//! The game itself is outside this crate. Hosts adapt their simulator to this
//! trait so [`EpisodeRunner`](crate::pipeline::EpisodeRunner) can drive it.

use crate::{Result, command::Command, observation::Observation};

/// A single-agent episodic environment.
pub trait Environment {
    /// Start a new episode and return its first observation.
    ///
    /// The returned observation should have
    /// [`StepType::First`](crate::observation::StepType::First).
    fn reset(&mut self) -> Result<Observation>;

    /// Apply one command and return the next observation.
    ///
    /// The episode ends when the returned observation has
    /// [`StepType::Last`](crate::observation::StepType::Last).
    fn step(&mut self, command: &Command) -> Result<Observation>;
}
