//! Episode pipeline abstractions
//!
//! This module provides:
//! - The episode loop driving an executor against a host environment
//! - Observers recording what the controller does while it learns

pub mod episode;
pub mod observers;

pub use episode::{EpisodeConfig, EpisodeRunner, EpisodeSummary, RunResult};
pub use observers::{
    ControllerEvent, MetricsObserver, MetricsSummary, RecordingObserver, TracingObserver,
};

pub use crate::ports::{ControllerObserver, Environment};
