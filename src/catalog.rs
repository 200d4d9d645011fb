//! The fixed, ordered set of high-level actions the controller chooses from
//!
//! Every Q-table row holds exactly one estimate per catalog entry, so the
//! catalog's order and size are part of the persisted table format.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    observation::FunctionId,
    types::{ActionIndex, MINIMAP_SIZE, Point},
};

/// Attack targets are sampled where `(cell + 1)` is a multiple of this stride.
const ATTACK_GRID_STRIDE: i32 = 32;

/// Offset subtracted from a sampled minimap cell to obtain the embedded attack offset.
const ATTACK_OFFSET_BIAS: i32 = 16;

/// Structures the controller knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    SupplyDepot,
    Barracks,
    Starport,
    Factory,
    Refinery,
}

impl Structure {
    /// The primitive build function for this structure.
    pub const fn function(self) -> FunctionId {
        match self {
            Structure::SupplyDepot => FunctionId::BuildSupplyDepot,
            Structure::Barracks => FunctionId::BuildBarracks,
            Structure::Starport => FunctionId::BuildStarport,
            Structure::Factory => FunctionId::BuildFactory,
            Structure::Refinery => FunctionId::BuildRefinery,
        }
    }

    fn identifier(self) -> &'static str {
        match self {
            Structure::SupplyDepot => "buildsupplydepot",
            Structure::Barracks => "buildbarracks",
            Structure::Starport => "buildstarport",
            Structure::Factory => "buildfactory",
            Structure::Refinery => "buildrefinery",
        }
    }
}

/// One high-level action, carrying its spatial parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartAction {
    DoNothing,
    Build(Structure),
    TrainMarine,
    /// Attack the minimap cell at this offset from the minimap centre.
    Attack { x: i32, y: i32 },
}

impl SmartAction {
    /// Embedded spatial offset, `(0, 0)` for actions without one.
    pub fn offset(&self) -> Point {
        match *self {
            SmartAction::Attack { x, y } => Point::new(x, y),
            _ => Point::new(0, 0),
        }
    }

    /// Short human-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            SmartAction::DoNothing => "do-nothing",
            SmartAction::Build(Structure::SupplyDepot) => "build-depot",
            SmartAction::Build(Structure::Refinery) => "build-refinery",
            SmartAction::Build(_) => "build-production",
            SmartAction::TrainMarine => "train-marine",
            SmartAction::Attack { .. } => "attack",
        }
    }
}

impl fmt::Display for SmartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmartAction::DoNothing => write!(f, "donothing"),
            SmartAction::Build(structure) => write!(f, "{}", structure.identifier()),
            SmartAction::TrainMarine => write!(f, "buildmarine"),
            SmartAction::Attack { x, y } => write!(f, "attack_{x}_{y}"),
        }
    }
}

impl FromStr for SmartAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || Error::UnknownActionIdentifier {
            identifier: s.to_string(),
        };

        match s {
            "donothing" => return Ok(SmartAction::DoNothing),
            "buildmarine" => return Ok(SmartAction::TrainMarine),
            "buildsupplydepot" => return Ok(SmartAction::Build(Structure::SupplyDepot)),
            "buildbarracks" => return Ok(SmartAction::Build(Structure::Barracks)),
            "buildstarport" => return Ok(SmartAction::Build(Structure::Starport)),
            "buildfactory" => return Ok(SmartAction::Build(Structure::Factory)),
            "buildrefinery" => return Ok(SmartAction::Build(Structure::Refinery)),
            _ => {}
        }

        let mut parts = s.split('_');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("attack"), Some(x), Some(y), None) => {
                let x = x.parse().map_err(|_| unknown())?;
                let y = y.parse().map_err(|_| unknown())?;
                Ok(SmartAction::Attack { x, y })
            }
            _ => Err(unknown()),
        }
    }
}

/// Ordered list of [`SmartAction`]s; an [`ActionIndex`] is a position in it.
///
/// # Examples
///
/// ```
/// use sparse_agent::catalog::{ActionCatalog, SmartAction};
/// use sparse_agent::types::ActionIndex;
///
/// let catalog = ActionCatalog::standard();
/// assert_eq!(catalog.len(), 11);
/// assert_eq!(catalog.decompose(ActionIndex::new(0))?, SmartAction::DoNothing);
/// # Ok::<(), sparse_agent::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCatalog {
    actions: Vec<SmartAction>,
}

impl ActionCatalog {
    /// The simple actions followed by one attack per sampled minimap cell.
    pub fn standard() -> Self {
        let mut actions = vec![
            SmartAction::DoNothing,
            SmartAction::Build(Structure::SupplyDepot),
            SmartAction::Build(Structure::Barracks),
            SmartAction::TrainMarine,
            SmartAction::Build(Structure::Starport),
            SmartAction::Build(Structure::Factory),
            SmartAction::Build(Structure::Refinery),
        ];

        for mm_x in 0..MINIMAP_SIZE {
            for mm_y in 0..MINIMAP_SIZE {
                if (mm_x + 1) % ATTACK_GRID_STRIDE == 0 && (mm_y + 1) % ATTACK_GRID_STRIDE == 0 {
                    actions.push(SmartAction::Attack {
                        x: mm_x - ATTACK_OFFSET_BIAS,
                        y: mm_y - ATTACK_OFFSET_BIAS,
                    });
                }
            }
        }

        Self { actions }
    }

    /// Rebuild a catalog from persisted identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownActionIdentifier`] for any identifier that does
    /// not name an action.
    pub fn from_identifiers<S: AsRef<str>>(identifiers: &[S]) -> Result<Self> {
        let actions = identifiers
            .iter()
            .map(|id| id.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { actions })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Look up the action at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] when `index` is outside the catalog.
    /// This only happens when a table and catalog have fallen out of sync.
    pub fn decompose(&self, index: ActionIndex) -> Result<SmartAction> {
        self.actions
            .get(index.value())
            .copied()
            .ok_or(Error::UnknownAction {
                index: index.value(),
                catalog_size: self.actions.len(),
            })
    }

    pub fn index_of(&self, action: SmartAction) -> Option<ActionIndex> {
        self.actions
            .iter()
            .position(|&candidate| candidate == action)
            .map(ActionIndex::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionIndex, SmartAction)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, &action)| (ActionIndex::new(i), action))
    }

    /// Canonical identifiers in catalog order.
    pub fn identifiers(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_layout() {
        let catalog = ActionCatalog::standard();
        assert_eq!(catalog.len(), 11);
        assert_eq!(
            catalog.identifiers(),
            vec![
                "donothing",
                "buildsupplydepot",
                "buildbarracks",
                "buildmarine",
                "buildstarport",
                "buildfactory",
                "buildrefinery",
                "attack_15_15",
                "attack_15_47",
                "attack_47_15",
                "attack_47_47",
            ]
        );
    }

    #[test]
    fn test_identifiers_roundtrip() {
        let catalog = ActionCatalog::standard();
        let rebuilt = ActionCatalog::from_identifiers(&catalog.identifiers()).unwrap();
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn test_attack_offsets_are_parsed() {
        let action: SmartAction = "attack_-3_47".parse().unwrap();
        assert_eq!(action, SmartAction::Attack { x: -3, y: 47 });
        assert_eq!(action.offset(), Point::new(-3, 47));
        assert_eq!(SmartAction::DoNothing.offset(), Point::new(0, 0));
    }

    #[test]
    fn test_malformed_identifiers_are_rejected() {
        for bad in ["attack", "attack_1", "attack_1_2_3", "attack_x_2", "buildnuke", ""] {
            assert!(
                matches!(
                    bad.parse::<SmartAction>(),
                    Err(Error::UnknownActionIdentifier { .. })
                ),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_out_of_range_index_is_fatal() {
        let catalog = ActionCatalog::standard();
        let err = catalog.decompose(ActionIndex::new(11)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownAction {
                index: 11,
                catalog_size: 11
            }
        ));
    }

    #[test]
    fn test_index_of() {
        let catalog = ActionCatalog::standard();
        assert_eq!(
            catalog.index_of(SmartAction::Build(Structure::Refinery)),
            Some(ActionIndex::new(6))
        );
        assert_eq!(catalog.index_of(SmartAction::Attack { x: 0, y: 0 }), None);
    }
}
