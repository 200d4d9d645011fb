//! Primitive commands returned to the environment, one per tick

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{catalog::Structure, observation::FunctionId, types::Point};

/// How a point selection combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectPointMode {
    /// Replace the selection with the unit under the point.
    Select,
    /// Select every visible unit of the same type as the one under the point.
    SelectAllType,
}

/// A single primitive game command.
///
/// Targets are raw cell coordinates; clipping to the screen or minimap
/// bounds is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum Command {
    NoOp,
    SelectArmy,
    SelectPoint {
        mode: SelectPointMode,
        target: Point,
    },
    Build {
        structure: Structure,
        queued: bool,
        target: Point,
    },
    TrainMarine {
        queued: bool,
    },
    AttackMinimap {
        queued: bool,
        target: Point,
    },
}

impl Command {
    /// The primitive function this command invokes.
    pub fn function(&self) -> FunctionId {
        match self {
            Command::NoOp => FunctionId::NoOp,
            Command::SelectArmy => FunctionId::SelectArmy,
            Command::SelectPoint { .. } => FunctionId::SelectPoint,
            Command::Build { structure, .. } => structure.function(),
            Command::TrainMarine { .. } => FunctionId::TrainMarine,
            Command::AttackMinimap { .. } => FunctionId::AttackMinimap,
        }
    }

    /// Spatial target, if the command carries one.
    pub fn target(&self) -> Option<Point> {
        match *self {
            Command::SelectPoint { target, .. }
            | Command::Build { target, .. }
            | Command::AttackMinimap { target, .. } => Some(target),
            Command::NoOp | Command::SelectArmy | Command::TrainMarine { .. } => None,
        }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, Command::NoOp)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NoOp => write!(f, "no_op"),
            Command::SelectArmy => write!(f, "select_army"),
            Command::SelectPoint { mode, target } => write!(f, "select_point({mode:?}, {target})"),
            Command::Build {
                structure,
                queued,
                target,
            } => write!(f, "build_{structure:?}(queued={queued}, {target})"),
            Command::TrainMarine { queued } => write!(f, "train_marine(queued={queued})"),
            Command::AttackMinimap { queued, target } => {
                write!(f, "attack_minimap(queued={queued}, {target})")
            }
        }
    }
}
