//! Per-episode session state owned by the executor

use serde::{Deserialize, Serialize};

use crate::{
    spatial::BaseOrientation,
    types::{ActionIndex, Point, StateKey},
};

/// Position within a decision cycle.
///
/// The cycle always runs `Select → Execute → Settle → Linger → Select`,
/// advancing once per tick whatever action is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A new action is chosen; handlers typically select a unit.
    #[default]
    Select,
    /// Handlers issue the main order (build, train, attack).
    Execute,
    /// Handlers let the order take effect.
    Settle,
    /// Extra settle tick before the next decision.
    Linger,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Select => Phase::Execute,
            Phase::Execute => Phase::Settle,
            Phase::Settle => Phase::Linger,
            Phase::Linger => Phase::Select,
        }
    }

    /// Numeric counter value, `0..=3`.
    pub fn index(self) -> u8 {
        match self {
            Phase::Select => 0,
            Phase::Execute => 1,
            Phase::Settle => 2,
            Phase::Linger => 3,
        }
    }
}

/// The state-action pair awaiting its TD update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub state: StateKey,
    pub action: ActionIndex,
}

/// Everything the executor remembers between ticks of one episode.
///
/// Holding the pending pair in a single `Option` means at most one
/// transition can ever be awaiting an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub pending: Option<PendingDecision>,
    pub phase: Phase,
    pub orientation: BaseOrientation,
    /// Command-center centroid seen on the first tick.
    pub command_center: Option<Point>,
}

impl SessionState {
    /// Return every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn advance(&mut self) {
        self.phase = self.phase.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycles_through_four_values() {
        let mut phase = Phase::Select;
        let seen: Vec<u8> = (0..9)
            .map(|_| {
                let index = phase.index();
                phase = phase.next();
                index
            })
            .collect();
        assert_eq!(seen, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState {
            pending: Some(PendingDecision {
                state: StateKey::parse("[1,0,0,0]"),
                action: ActionIndex::new(3),
            }),
            phase: Phase::Settle,
            orientation: BaseOrientation::TopLeft,
            command_center: Some(Point::new(30, 30)),
        };
        session.reset();
        assert_eq!(session, SessionState::default());
        assert_eq!(session.phase, Phase::Select);
    }
}
