//! Common test utilities for the sparse-agent test suite.
//!
//! Builders for synthetic observations with a recognisable base layout.

#![allow(dead_code)]

use sparse_agent::{
    catalog::{ActionCatalog, SmartAction},
    executor::ActionExecutor,
    observation::{FeatureMap, FunctionId, Observation, PLAYER_SELF, StepType, UnitType},
    q_learning::{Hyperparameters, QTable},
    spatial::TargetResolver,
    types::StateKey,
};

pub const SCREEN_SIZE: usize = 84;
pub const MINIMAP_SIZE: usize = 64;

/// Square command-center block whose centroid is `(cx, cy)`.
pub fn screen_with_base(cx: usize, cy: usize) -> FeatureMap {
    let mut screen = FeatureMap::filled(SCREEN_SIZE, SCREEN_SIZE, 0);
    screen.fill_rect(cx - 2, cy - 2, cx + 3, cy + 3, UnitType::CommandCenter.id());
    screen
}

/// Add a single worker cell.
pub fn with_worker(mut screen: FeatureMap, x: usize, y: usize) -> FeatureMap {
    screen.set(x, y, UnitType::Scv.id());
    screen
}

/// Add `cells` supply-depot cells in a band along the bottom rows.
pub fn with_depot_cells(mut screen: FeatureMap, cells: usize) -> FeatureMap {
    for i in 0..cells {
        screen.set(i % SCREEN_SIZE, SCREEN_SIZE - 1 - i / SCREEN_SIZE, UnitType::SupplyDepot.id());
    }
    screen
}

/// Minimap with friendly cells around row `y`.
pub fn minimap_with_base_at_row(y: usize) -> FeatureMap {
    let mut minimap = FeatureMap::filled(MINIMAP_SIZE, MINIMAP_SIZE, 0);
    minimap.fill_rect(10, y - 2, 15, y + 3, PLAYER_SELF);
    minimap
}

pub fn top_left_minimap() -> FeatureMap {
    minimap_with_base_at_row(16)
}

pub fn bottom_right_minimap() -> FeatureMap {
    minimap_with_base_at_row(48)
}

/// Every primitive function legal.
pub fn all_functions() -> Vec<FunctionId> {
    vec![
        FunctionId::NoOp,
        FunctionId::SelectPoint,
        FunctionId::SelectArmy,
        FunctionId::AttackMinimap,
        FunctionId::BuildSupplyDepot,
        FunctionId::BuildBarracks,
        FunctionId::BuildStarport,
        FunctionId::BuildFactory,
        FunctionId::BuildRefinery,
        FunctionId::TrainMarine,
    ]
}

pub fn observation(step_type: StepType, screen: FeatureMap, minimap: FeatureMap) -> Observation {
    Observation::new(step_type)
        .with_screen(screen)
        .with_minimap(minimap)
        .with_available(all_functions())
}

/// Executor that always exploits, with `action` valued highest in `states`.
pub fn executor_preferring(action: SmartAction, states: &[StateKey]) -> ActionExecutor {
    let catalog = ActionCatalog::standard();
    let index = catalog.index_of(action).expect("action in catalog");
    let params = Hyperparameters {
        epsilon: 1.0,
        ..Hyperparameters::default()
    };
    let mut table = QTable::new(catalog.len(), params).with_seed(11);
    for state in states {
        table.set(state.clone(), index, 10.0).expect("valid index");
    }
    ActionExecutor::new(catalog, table, TargetResolver::new(Some(11))).expect("matching widths")
}

/// Environment replaying a fixed base layout for `length` mid ticks, then
/// ending with `reward`.
pub struct ScriptedEnvironment {
    pub length: usize,
    pub reward: f64,
    pub tick: usize,
    pub commands: Vec<sparse_agent::command::Command>,
}

impl ScriptedEnvironment {
    pub fn new(length: usize, reward: f64) -> Self {
        Self {
            length,
            reward,
            tick: 0,
            commands: Vec::new(),
        }
    }

    fn frame(&self, step_type: StepType) -> Observation {
        observation(
            step_type,
            with_worker(screen_with_base(30, 30), 50, 20),
            top_left_minimap(),
        )
    }
}

impl sparse_agent::ports::Environment for ScriptedEnvironment {
    fn reset(&mut self) -> sparse_agent::Result<Observation> {
        self.tick = 0;
        Ok(self.frame(StepType::First))
    }

    fn step(
        &mut self,
        command: &sparse_agent::command::Command,
    ) -> sparse_agent::Result<Observation> {
        self.commands.push(*command);
        self.tick += 1;
        if self.tick > self.length {
            Ok(self.frame(StepType::Last).with_reward(self.reward))
        } else {
            Ok(self.frame(StepType::Mid))
        }
    }
}
