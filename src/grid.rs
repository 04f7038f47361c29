//! Occupancy store shared by every entity in the world.
//!
//! [`Grid`] is a fixed-size rectangle of optional [`Entity`] values. It
//! enforces three invariants on every mutation: an entity occupies at most
//! one cell, a cell holds at most one entity, and every coordinate lies
//! inside the rectangle. Violations are returned as [`GridError`] without
//! touching the stored state.
//!
//! Cells are scanned column by column (x outer, y inner). That order is
//! observable through [`Grid::empty_cells`] and the typed lookups, and the
//! spawner relies on it for reproducible placement.

use std::collections::BTreeMap;
use std::fmt;

use glam::IVec2;
use log::trace;
use serde::Serialize;
use thiserror::Error;

use crate::entity::{CargoBox, Entity, EntityId, EntityKind};

/// Discrete (column, row) coordinate.
///
/// Ordering is column-then-row, matching the grid's scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    /// Column index.
    pub x: i32,
    /// Row index; larger values are further "up".
    pub y: i32,
}

impl Cell {
    /// Creates a cell from its column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell reached by moving one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        Self::from(IVec2::from(self) + direction.offset())
    }

    /// The four orthogonal neighbours in [`Direction::SEARCH_ORDER`].
    #[must_use]
    pub fn neighbours(self) -> [Self; 4] {
        Direction::SEARCH_ORDER.map(|direction| self.step(direction))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<IVec2> for Cell {
    fn from(v: IVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Cell> for IVec2 {
    fn from(cell: Cell) -> Self {
        Self::new(cell.x, cell.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards larger rows.
    Up,
    /// Towards smaller rows.
    Down,
    /// Towards smaller columns.
    Left,
    /// Towards larger columns.
    Right,
}

impl Direction {
    /// Neighbour visitation order used by the path finder. Ties between
    /// equally near destinations resolve in this order.
    pub const SEARCH_ORDER: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit offset for this direction.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::Up => IVec2::Y,
            Self::Down => IVec2::NEG_Y,
            Self::Left => IVec2::NEG_X,
            Self::Right => IVec2::X,
        }
    }
}

/// Contract violations reported by [`Grid`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height was zero or too large to address.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A coordinate fell outside the grid.
    #[error("cell {cell} is outside the grid")]
    OutOfRange {
        /// Offending coordinate.
        cell: Cell,
    },
    /// The entity is already placed somewhere on the grid.
    #[error("entity {entity} is already placed at {cell}")]
    AlreadyPlaced {
        /// Entity that was being added.
        entity: EntityId,
        /// Where it currently sits.
        cell: Cell,
    },
    /// The target cell already has an occupant.
    #[error("cell {cell} is already occupied by {occupant}")]
    Occupied {
        /// Target coordinate.
        cell: Cell,
        /// Current occupant.
        occupant: EntityId,
    },
    /// The cell does not hold the entity being removed.
    #[error("cell {cell} does not contain entity {expected}")]
    RemoveMismatch {
        /// Coordinate that was inspected.
        cell: Cell,
        /// Entity the caller expected to find.
        expected: EntityId,
        /// Entity actually present, if any.
        found: Option<EntityId>,
    },
}

/// Fixed-size rectangular occupancy map.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Option<Entity>>,
    next_id: u64,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero or
    /// exceeds `i32::MAX`.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(invalid);
        };
        let len = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| GridError::InvalidDimensions { width, height })?;
        trace!("creating {width}x{height} grid");
        Ok(Self {
            width: w,
            height: h,
            tiles: vec![None; len],
            next_id: 0,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Hands out a fresh identifier for a new entity.
    pub const fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether `cell` lies inside the grid.
    #[must_use]
    pub const fn in_range(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Whether `cell` lies inside the grid and is unoccupied.
    #[must_use]
    pub fn is_passable(&self, cell: Cell) -> bool {
        matches!(self.slot(cell), Some(None))
    }

    /// Returns the occupant of `cell`.
    ///
    /// # Errors
    /// Returns [`GridError::OutOfRange`] if `cell` is outside the grid.
    pub fn entity_at(&self, cell: Cell) -> Result<Option<&Entity>, GridError> {
        self.slot(cell)
            .map(Option::as_ref)
            .ok_or(GridError::OutOfRange { cell })
    }

    /// Whether the entity occupies any cell.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.locate(id).is_some()
    }

    /// Finds the cell holding the entity, if any.
    #[must_use]
    pub fn locate(&self, id: EntityId) -> Option<Cell> {
        self.occupied().find_map(|(cell, entity)| (entity.id() == id).then_some(cell))
    }

    /// Occupied cells of the requested kind, keyed in scan order.
    #[must_use]
    pub fn entities_of_kind(&self, kind: EntityKind) -> BTreeMap<Cell, &Entity> {
        self.occupied()
            .filter(|(_, entity)| entity.kind() == kind)
            .collect()
    }

    /// Every box on the grid keyed by its cell.
    #[must_use]
    pub fn boxes(&self) -> BTreeMap<Cell, &CargoBox> {
        self.occupied()
            .filter_map(|(cell, entity)| entity.as_box().map(|cargo| (cell, cargo)))
            .collect()
    }

    /// Every collector marker on the grid keyed by its cell.
    #[must_use]
    pub fn collectors(&self) -> BTreeMap<Cell, EntityId> {
        self.occupied()
            .filter_map(|(cell, entity)| match entity {
                Entity::Collector(id) => Some((cell, *id)),
                Entity::Box(_) => None,
            })
            .collect()
    }

    /// All unoccupied cells in scan order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells()
            .filter(|&cell| self.is_passable(cell))
            .collect()
    }

    /// Places `entity` at `cell`.
    ///
    /// # Errors
    /// Fails without mutating the grid if `cell` is out of range, the entity
    /// is already placed, or the cell is occupied.
    pub fn add(&mut self, entity: Entity, cell: Cell) -> Result<(), GridError> {
        trace!("adding {entity} at {cell}");
        if !self.in_range(cell) {
            return Err(GridError::OutOfRange { cell });
        }
        if let Some(existing) = self.locate(entity.id()) {
            return Err(GridError::AlreadyPlaced {
                entity: entity.id(),
                cell: existing,
            });
        }
        let slot = self.slot_mut(cell).ok_or(GridError::OutOfRange { cell })?;
        if let Some(occupant) = slot {
            return Err(GridError::Occupied {
                cell,
                occupant: occupant.id(),
            });
        }
        *slot = Some(entity);
        Ok(())
    }

    /// Takes the entity `id` out of `cell`, handing ownership to the caller.
    ///
    /// # Errors
    /// Fails if `cell` is out of range or does not hold exactly `id`.
    pub fn remove(&mut self, id: EntityId, cell: Cell) -> Result<Entity, GridError> {
        trace!("removing entity {id} from {cell}");
        let slot = self.slot_mut(cell).ok_or(GridError::OutOfRange { cell })?;
        let found = slot.as_ref().map(Entity::id);
        if found != Some(id) {
            return Err(GridError::RemoveMismatch {
                cell,
                expected: id,
                found,
            });
        }
        slot.take().ok_or(GridError::RemoveMismatch {
            cell,
            expected: id,
            found: None,
        })
    }

    /// Moves entity `id` from `from` to `to`.
    ///
    /// This is [`Grid::remove`] followed by [`Grid::add`]. When the add fails
    /// the entity stays removed, so callers must only move onto cells they
    /// have checked.
    ///
    /// # Errors
    /// Propagates the failing step's [`GridError`].
    pub fn move_entity(&mut self, id: EntityId, from: Cell, to: Cell) -> Result<(), GridError> {
        trace!("moving entity {id} from {from} to {to}");
        let entity = self.remove(id, from)?;
        self.add(entity, to)
    }

    /// Every coordinate in scan order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Cell::new(x, y)))
    }

    fn occupied(&self) -> impl Iterator<Item = (Cell, &Entity)> + '_ {
        self.cells()
            .filter_map(move |cell| self.slot(cell).and_then(Option::as_ref).map(|e| (cell, e)))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.in_range(cell) {
            return None;
        }
        usize::try_from(i64::from(cell.x) * i64::from(self.height) + i64::from(cell.y)).ok()
    }

    fn slot(&self, cell: Cell) -> Option<&Option<Entity>> {
        self.index(cell).and_then(|i| self.tiles.get(i))
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut Option<Entity>> {
        self.index(cell).and_then(|i| self.tiles.get_mut(i))
    }
}
