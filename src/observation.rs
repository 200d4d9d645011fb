//! Per-tick observation snapshot supplied by the host environment
//!
//! The controller never produces observations; it only reads the handful of
//! feature layers it needs: the screen unit-type layer, the minimap
//! ownership layer, the player summary vector and the set of currently legal
//! primitive functions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, types::Point};

/// Index of army supply in the player summary vector.
pub const ARMY_SUPPLY_INDEX: usize = 5;

/// Minimap ownership value for cells occupied by our own units.
pub const PLAYER_SELF: i32 = 1;

/// Unit types the controller looks for on the screen layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    CommandCenter,
    SupplyDepot,
    Barracks,
    Factory,
    Starport,
    Scv,
    MineralField,
    VespeneGeyser,
}

impl UnitType {
    /// Value of this unit type in the screen unit-type layer.
    pub const fn id(self) -> i32 {
        match self {
            UnitType::CommandCenter => 18,
            UnitType::SupplyDepot => 19,
            UnitType::Barracks => 21,
            UnitType::Factory => 27,
            UnitType::Starport => 28,
            UnitType::Scv => 45,
            UnitType::MineralField => 341,
            UnitType::VespeneGeyser => 342,
        }
    }
}

/// Primitive functions the controller can issue, and that the host reports as
/// legal each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionId {
    NoOp,
    SelectPoint,
    SelectArmy,
    AttackMinimap,
    BuildSupplyDepot,
    BuildBarracks,
    BuildStarport,
    BuildFactory,
    BuildRefinery,
    TrainMarine,
}

/// Position of the tick within its episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    First,
    #[default]
    Mid,
    Last,
}

/// A dense row-major integer layer (`cells[y * width + x]`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureMap")]
pub struct FeatureMap {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

/// Unchecked wire form; deserialized maps go through [`FeatureMap::new`].
#[derive(Deserialize)]
struct RawFeatureMap {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl TryFrom<RawFeatureMap> for FeatureMap {
    type Error = Error;

    fn try_from(raw: RawFeatureMap) -> Result<Self> {
        FeatureMap::new(raw.width, raw.height, raw.cells)
    }
}

impl FeatureMap {
    /// Build a layer from raw cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFeatureMap`] if `cells.len() != width * height`.
    pub fn new(width: usize, height: usize, cells: Vec<i32>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(Error::InvalidFeatureMap {
                width,
                height,
                len: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A layer with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Set one cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: i32) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Fill the inclusive-exclusive rectangle `[x0, x1) × [y0, y1)` with `value`.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, value: i32) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.cells[y * self.width + x] = value;
            }
        }
    }

    /// All cells holding `value`, in row-major order.
    pub fn positions(&self, value: i32) -> impl Iterator<Item = Point> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &cell)| cell == value)
            .map(move |(i, _)| Point::new((i % width) as i32, (i / width) as i32))
    }

    /// Number of cells holding `value`.
    pub fn count(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&cell| cell == value).count()
    }
}

/// Everything the controller reads from the environment for one tick.
///
/// # Examples
///
/// ```
/// use sparse_agent::observation::{FeatureMap, FunctionId, Observation, StepType};
///
/// let obs = Observation::new(StepType::First)
///     .with_screen(FeatureMap::filled(84, 84, 0))
///     .with_available([FunctionId::NoOp, FunctionId::SelectPoint]);
/// assert!(obs.is_first());
/// assert!(obs.is_available(FunctionId::SelectPoint));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub step_type: StepType,
    /// Terminal episode reward; only meaningful on the last step.
    #[serde(default)]
    pub reward: f64,
    /// Screen unit-type layer.
    #[serde(default)]
    pub screen_unit_type: FeatureMap,
    /// Minimap player-relative (ownership) layer.
    #[serde(default)]
    pub minimap_player_relative: FeatureMap,
    /// Player summary vector (minerals, gas, supply, ...).
    #[serde(default)]
    pub player: Vec<i64>,
    #[serde(default)]
    pub available_actions: HashSet<FunctionId>,
}

impl Observation {
    pub fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            ..Self::default()
        }
    }

    pub fn with_screen(mut self, screen: FeatureMap) -> Self {
        self.screen_unit_type = screen;
        self
    }

    pub fn with_minimap(mut self, minimap: FeatureMap) -> Self {
        self.minimap_player_relative = minimap;
        self
    }

    pub fn with_player(mut self, player: Vec<i64>) -> Self {
        self.player = player;
        self
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_available(mut self, functions: impl IntoIterator<Item = FunctionId>) -> Self {
        self.available_actions.extend(functions);
        self
    }

    pub fn is_first(&self) -> bool {
        self.step_type == StepType::First
    }

    pub fn is_last(&self) -> bool {
        self.step_type == StepType::Last
    }

    pub fn is_available(&self, function: FunctionId) -> bool {
        self.available_actions.contains(&function)
    }

    /// Current army supply, 0 when the summary vector is too short.
    pub fn army_supply(&self) -> i64 {
        self.player.get(ARMY_SUPPLY_INDEX).copied().unwrap_or(0)
    }
}
