//! Occupants of the grid.
//!
//! The grid stores a closed set of entity kinds so every consumer can match
//! exhaustively. Boxes are plain data; the collector is represented on the
//! grid by a marker carrying only its identifier, with its behaviour living
//! in [`crate::agent::Collector`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity identifier with type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u64);

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Colour tag carried by every box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoxColor {
    /// A red box.
    Red,
    /// A blue box.
    Blue,
}

impl BoxColor {
    /// Every colour, in the order sorting rules are evaluated.
    pub const ALL: [Self; 2] = [Self::Red, Self::Blue];
}

impl fmt::Display for BoxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Blue => f.write_str("blue"),
        }
    }
}

/// A static coloured box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CargoBox {
    /// Identity of the box while it exists in the simulation.
    pub id: EntityId,
    /// Immutable colour tag.
    pub color: BoxColor,
}

impl CargoBox {
    /// Creates a box with the given identity and colour.
    #[must_use]
    pub const fn new(id: EntityId, color: BoxColor) -> Self {
        Self { id, color }
    }
}

/// Discriminant used to filter grid contents by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Matches [`Entity::Box`].
    Box,
    /// Matches [`Entity::Collector`].
    Collector,
}

/// Anything that can occupy a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Entity {
    /// A box waiting to be sorted (or already sorted).
    Box(CargoBox),
    /// The collector agent's presence on the grid.
    Collector(EntityId),
}

impl Entity {
    /// Identifier of the occupant.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Box(cargo) => cargo.id,
            Self::Collector(id) => *id,
        }
    }

    /// Kind tag of the occupant.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Box(_) => EntityKind::Box,
            Self::Collector(_) => EntityKind::Collector,
        }
    }

    /// Returns the box payload when the occupant is a box.
    #[must_use]
    pub const fn as_box(&self) -> Option<&CargoBox> {
        match self {
            Self::Box(cargo) => Some(cargo),
            Self::Collector(_) => None,
        }
    }

    /// Whether the occupant is a box.
    #[must_use]
    pub const fn is_box(&self) -> bool {
        matches!(self, Self::Box(_))
    }
}

impl From<CargoBox> for Entity {
    fn from(cargo: CargoBox) -> Self {
        Self::Box(cargo)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box(cargo) => write!(f, "{} box {}", cargo.color, cargo.id),
            Self::Collector(id) => write!(f, "collector {id}"),
        }
    }
}
