//! Spatial target resolution on the screen and minimap layers
//!
//! Build offsets are authored for a base in the upper-left of the map; when
//! the controlled side starts lower-right every offset is mirrored.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    observation::{FeatureMap, PLAYER_SELF, UnitType},
    types::{MINIMAP_SIZE, Point},
};

/// Friendly units whose mean minimap row is at or above this row start top-left.
const TOP_HALF_LAST_ROW: f64 = 31.0;

/// Which corner of the map the controlled side starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseOrientation {
    TopLeft,
    #[default]
    BottomRight,
}

impl BaseOrientation {
    pub fn flipped(self) -> Self {
        match self {
            BaseOrientation::TopLeft => BaseOrientation::BottomRight,
            BaseOrientation::BottomRight => BaseOrientation::TopLeft,
        }
    }
}

/// Decide the base orientation from the minimap ownership layer.
///
/// Top-left when friendly cells exist and their mean row lies in the upper
/// half; bottom-right otherwise, including when nothing friendly is visible.
pub fn detect_orientation(minimap: &FeatureMap) -> BaseOrientation {
    let (sum, count) = minimap
        .positions(PLAYER_SELF)
        .fold((0i64, 0usize), |(sum, count), p| (sum + i64::from(p.y), count + 1));

    if count > 0 && (sum as f64 / count as f64) <= TOP_HALF_LAST_ROW {
        BaseOrientation::TopLeft
    } else {
        BaseOrientation::BottomRight
    }
}

/// Apply an offset authored for a top-left base.
///
/// # Examples
///
/// ```
/// use sparse_agent::spatial::{BaseOrientation, transform_offset};
/// use sparse_agent::types::Point;
///
/// let origin = Point::new(40, 30);
/// let offset = Point::new(15, -15);
/// assert_eq!(transform_offset(origin, offset, BaseOrientation::TopLeft), Point::new(55, 15));
/// assert_eq!(transform_offset(origin, offset, BaseOrientation::BottomRight), Point::new(25, 45));
/// ```
pub fn transform_offset(origin: Point, offset: Point, orientation: BaseOrientation) -> Point {
    match orientation {
        BaseOrientation::TopLeft => Point::new(origin.x + offset.x, origin.y + offset.y),
        BaseOrientation::BottomRight => Point::new(origin.x - offset.x, origin.y - offset.y),
    }
}

/// Mirror an absolute minimap location for a bottom-right base.
pub fn transform_location(location: Point, orientation: BaseOrientation) -> Point {
    match orientation {
        BaseOrientation::TopLeft => location,
        BaseOrientation::BottomRight => {
            Point::new(MINIMAP_SIZE - location.x, MINIMAP_SIZE - location.y)
        }
    }
}

/// Rounded mean position of every cell holding `unit`.
///
/// Halves round to even so that a centroid sitting exactly between two cells
/// resolves the same way on every platform.
pub fn centroid(screen: &FeatureMap, unit: UnitType) -> Option<Point> {
    let (sx, sy, n) = screen
        .positions(unit.id())
        .fold((0i64, 0i64, 0usize), |(sx, sy, n), p| {
            (sx + i64::from(p.x), sy + i64::from(p.y), n + 1)
        });

    if n == 0 {
        return None;
    }
    let mean = |sum: i64| (sum as f64 / n as f64).round_ties_even() as i32;
    Some(Point::new(mean(sx), mean(sy)))
}

/// Picks concrete screen cells for unit selection and build targets.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    rng: StdRng,
}

impl TargetResolver {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    /// A uniformly random cell holding `unit`, or `None` when there is none.
    pub fn locate(&mut self, unit: UnitType, screen: &FeatureMap) -> Option<Point> {
        let matches: Vec<Point> = screen.positions(unit.id()).collect();
        matches.choose(&mut self.rng).copied()
    }
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn minimap_with_friendly_rows(rows: &[usize]) -> FeatureMap {
        let mut map = FeatureMap::filled(64, 64, 0);
        for &row in rows {
            map.set(10, row, PLAYER_SELF);
        }
        map
    }

    #[test]
    fn test_orientation_from_friendly_centroid() {
        assert_eq!(
            detect_orientation(&minimap_with_friendly_rows(&[10, 20, 30])),
            BaseOrientation::TopLeft
        );
        assert_eq!(
            detect_orientation(&minimap_with_friendly_rows(&[31])),
            BaseOrientation::TopLeft
        );
        assert_eq!(
            detect_orientation(&minimap_with_friendly_rows(&[30, 50])),
            BaseOrientation::BottomRight
        );
    }

    #[test]
    fn test_orientation_without_friendly_units() {
        assert_eq!(
            detect_orientation(&FeatureMap::filled(64, 64, 0)),
            BaseOrientation::BottomRight
        );
        assert_eq!(
            detect_orientation(&FeatureMap::default()),
            BaseOrientation::BottomRight
        );
    }

    #[test]
    fn test_transform_offset_sign_symmetry() {
        let origin = Point::new(0, 0);
        for &(dx, dy) in &[(15, -15), (30, 7), (-4, 0), (0, 0)] {
            for orientation in [BaseOrientation::TopLeft, BaseOrientation::BottomRight] {
                let a = transform_offset(origin, Point::new(dx, dy), orientation);
                let b = transform_offset(origin, Point::new(-dx, -dy), orientation.flipped());
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_transform_location_mirrors() {
        let p = Point::new(15, 47);
        assert_eq!(transform_location(p, BaseOrientation::TopLeft), p);
        assert_eq!(
            transform_location(p, BaseOrientation::BottomRight),
            Point::new(49, 17)
        );
    }

    #[test]
    fn test_centroid_rounds_half_to_even() {
        let mut screen = FeatureMap::filled(10, 10, 0);
        screen.set(2, 4, UnitType::CommandCenter.id());
        screen.set(3, 4, UnitType::CommandCenter.id());
        screen.set(2, 5, UnitType::CommandCenter.id());
        screen.set(3, 5, UnitType::CommandCenter.id());
        // mean = (2.5, 4.5)
        assert_eq!(
            centroid(&screen, UnitType::CommandCenter),
            Some(Point::new(2, 4))
        );
        assert_eq!(centroid(&screen, UnitType::Scv), None);
    }

    #[test]
    fn test_locate_only_returns_matching_cells() {
        let mut screen = FeatureMap::filled(8, 8, 0);
        let cells = [Point::new(1, 1), Point::new(6, 2), Point::new(3, 7)];
        for p in cells {
            screen.set(p.x as usize, p.y as usize, UnitType::Scv.id());
        }

        let mut resolver = TargetResolver::new(Some(3));
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let found = resolver.locate(UnitType::Scv, &screen).unwrap();
            assert!(cells.contains(&found));
            seen.insert(found);
        }
        assert_eq!(seen.len(), cells.len());
    }

    #[test]
    fn test_locate_on_empty_map_is_none() {
        let mut resolver = TargetResolver::new(Some(1));
        assert_eq!(resolver.locate(UnitType::Scv, &FeatureMap::default()), None);
        assert_eq!(
            resolver.locate(UnitType::VespeneGeyser, &FeatureMap::filled(4, 4, 0)),
            None
        );
    }
}
