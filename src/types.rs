//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of the minimap in cells.
pub const MINIMAP_SIZE: i32 = 64;

/// Centre of the minimap, the origin attack offsets are measured from.
pub const MINIMAP_CENTER: Point = Point::new(32, 32);

/// An integer cell coordinate on the screen or minimap (`x` = column, `y` = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Index of one entry in the [`ActionCatalog`](crate::catalog::ActionCatalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionIndex(usize);

impl ActionIndex {
    pub const fn new(value: usize) -> Self {
        ActionIndex(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<ActionIndex> for usize {
    fn from(index: ActionIndex) -> Self {
        index.0
    }
}

impl fmt::Display for ActionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical string identifying one Q-table row.
///
/// Keys are produced by [`StateVector::key`](crate::encoder::StateVector::key)
/// or are the distinguished [`StateKey::terminal`] sentinel.
///
/// # Examples
///
/// ```
/// use sparse_agent::types::StateKey;
///
/// let key = StateKey::parse("[1,0,2,7]");
/// assert!(!key.is_terminal());
/// assert!(StateKey::terminal().is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    const TERMINAL: &'static str = "terminal";

    /// Wrap an already canonical key string.
    pub fn parse(s: &str) -> Self {
        StateKey(s.to_string())
    }

    /// The pseudo-state that marks the end of an episode.
    pub fn terminal() -> Self {
        StateKey(Self::TERMINAL.to_string())
    }

    pub fn is_terminal(&self) -> bool {
        self.0 == Self::TERMINAL
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
