//! Discretises an observation into the small state vector used as a table key

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    observation::{Observation, UnitType},
    types::StateKey,
};

/// Approximate screen footprint of one supply depot, in cells.
pub const SUPPLY_DEPOT_FOOTPRINT: usize = 69;

/// Approximate screen footprint of one production structure, in cells.
pub const PRODUCTION_FOOTPRINT: usize = 137;

const PRODUCTION_STRUCTURES: [UnitType; 3] =
    [UnitType::Barracks, UnitType::Starport, UnitType::Factory];

/// Encoded state: base presence, depot count, production count, army supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StateVector {
    pub command_center: i64,
    pub supply_depots: i64,
    pub production_structures: i64,
    pub army_supply: i64,
}

impl StateVector {
    pub fn as_array(&self) -> [i64; 4] {
        [
            self.command_center,
            self.supply_depots,
            self.production_structures,
            self.army_supply,
        ]
    }

    /// Canonical, lossless table key, e.g. `[1,2,0,6]`.
    pub fn key(&self) -> StateKey {
        StateKey::parse(&self.to_string())
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.as_array();
        write!(f, "[{a},{b},{c},{d}]")
    }
}

/// Round a cell count to a whole number of structures.
fn bucket(cells: usize, footprint: usize) -> i64 {
    (cells as f64 / footprint as f64).round() as i64
}

/// Encode one observation. Pure: equal observations give equal vectors.
pub fn encode(observation: &Observation) -> StateVector {
    let screen = &observation.screen_unit_type;

    let command_center = i64::from(screen.count(UnitType::CommandCenter.id()) > 0);
    let supply_depots = bucket(
        screen.count(UnitType::SupplyDepot.id()),
        SUPPLY_DEPOT_FOOTPRINT,
    );
    let production_structures = PRODUCTION_STRUCTURES
        .iter()
        .map(|unit| bucket(screen.count(unit.id()), PRODUCTION_FOOTPRINT))
        .sum();

    StateVector {
        command_center,
        supply_depots,
        production_structures,
        army_supply: observation.army_supply(),
    }
}
