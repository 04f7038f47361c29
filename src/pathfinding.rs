//! Breadth-first route planning over the occupancy grid.
//!
//! [`find_shortest`] searches outwards from an origin one ring at a time, so
//! the first destination it touches is the nearest one. Neighbours are
//! expanded in [`Direction::SEARCH_ORDER`](crate::grid::Direction::SEARCH_ORDER),
//! which makes the choice between equally near destinations deterministic.
//!
//! Destination cells are accepted even when occupied (a box being fetched
//! sits on its own destination) but are never walked through.

use std::collections::VecDeque;
use std::fmt;

use hashbrown::{HashMap, HashSet};
use log::trace;
use thiserror::Error;

use crate::grid::{Cell, Grid};

/// Contract violations reported by path planning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The search origin lies outside the grid.
    #[error("path origin {origin} is outside the grid")]
    OriginOutOfRange {
        /// Requested origin.
        origin: Cell,
    },
    /// The caller supplied no destinations to search for.
    #[error("no destinations supplied")]
    NoDestinations,
    /// A step was requested from a path with none left.
    #[error("path to {destination} has no steps remaining")]
    Exhausted {
        /// Destination of the exhausted path.
        destination: Cell,
    },
}

/// Route from an origin to a destination, exclusive of both ends.
///
/// The path only shrinks: steps are consumed from the front and it is never
/// re-planned in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: VecDeque<Cell>,
    destination: Cell,
}

impl Path {
    /// Builds a path from explicit steps.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = Cell>, destination: Cell) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            destination,
        }
    }

    /// Cell the path leads to.
    #[must_use]
    pub const fn destination(&self) -> Cell {
        self.destination
    }

    /// Number of steps still to walk.
    #[must_use]
    pub fn steps_remaining(&self) -> usize {
        self.steps.len()
    }

    /// Whether the origin is already adjacent to the destination.
    #[must_use]
    pub fn is_arrived(&self) -> bool {
        self.steps.is_empty()
    }

    /// Remaining steps in walking order.
    pub fn steps(&self) -> impl Iterator<Item = Cell> + '_ {
        self.steps.iter().copied()
    }

    /// Checks that every remaining step is still inside the grid and empty.
    #[must_use]
    pub fn is_passable(&self, grid: &Grid) -> bool {
        let blocked = self.steps().find(|&step| !grid.is_passable(step));
        if let Some(cell) = blocked {
            trace!("path {self} blocked at {cell}");
        }
        blocked.is_none()
    }

    /// Consumes and returns the next step.
    ///
    /// # Errors
    /// Returns [`PathError::Exhausted`] when no steps remain.
    pub fn pop_next_step(&mut self) -> Result<Cell, PathError> {
        self.steps.pop_front().ok_or(PathError::Exhausted {
            destination: self.destination,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{step}")?;
        }
        write!(f, "] -> {}", self.destination)
    }
}

/// Finds the shortest route from `origin` to whichever of `destinations` is
/// nearest.
///
/// Returns `Ok(None)` when no destination can be reached.
///
/// # Errors
/// Returns [`PathError::OriginOutOfRange`] if `origin` is outside the grid
/// and [`PathError::NoDestinations`] if `destinations` is empty.
///
/// # Examples
/// ```
/// use boxworld::grid::{Cell, Grid};
/// use boxworld::pathfinding::find_shortest;
///
/// let grid = Grid::new(10, 10)?;
/// let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(4, 0)])?
///     .ok_or("expected a path")?;
/// assert_eq!(path.steps_remaining(), 3);
/// assert_eq!(path.destination(), Cell::new(4, 0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn find_shortest(
    grid: &Grid,
    origin: Cell,
    destinations: &[Cell],
) -> Result<Option<Path>, PathError> {
    if !grid.in_range(origin) {
        return Err(PathError::OriginOutOfRange { origin });
    }
    if destinations.is_empty() {
        return Err(PathError::NoDestinations);
    }
    trace!(
        "searching from {origin} for any of {} destinations",
        destinations.len()
    );

    let targets: HashSet<Cell> = destinations.iter().copied().collect();
    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut visited: HashSet<Cell> = HashSet::new();
    visited.insert(origin);
    let mut frontier: VecDeque<(Cell, usize)> = VecDeque::new();
    frontier.push_back((origin, 0));
    let mut depth_seen = 0;

    while let Some((current, depth)) = frontier.pop_front() {
        if depth > depth_seen {
            trace!("{} cells reachable in {depth} steps", frontier.len() + 1);
            depth_seen = depth;
        }
        for next in current.neighbours() {
            if targets.contains(&next) {
                let path = Path::new(trace_back(&parents, origin, current), next);
                trace!("shortest path found: {path}");
                return Ok(Some(path));
            }
            if grid.is_passable(next) && visited.insert(next) {
                parents.insert(next, current);
                frontier.push_back((next, depth + 1));
            }
        }
    }

    trace!("no destination reachable from {origin}");
    Ok(None)
}

/// Rebuilds the walked cells between `origin` and `last`, origin excluded.
fn trace_back(parents: &HashMap<Cell, Cell>, origin: Cell, last: Cell) -> Vec<Cell> {
    let mut steps = Vec::new();
    let mut cursor = last;
    while cursor != origin {
        steps.push(cursor);
        let Some(&parent) = parents.get(&cursor) else {
            break;
        };
        cursor = parent;
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BoxColor, CargoBox, Entity};

    fn block(grid: &mut Grid, cell: Cell) {
        let id = grid.allocate_id();
        grid.add(Entity::Box(CargoBox::new(id, BoxColor::Blue)), cell)
            .expect("blocker placed");
    }

    #[test]
    fn trace_back_excludes_origin() {
        let mut parents = HashMap::new();
        parents.insert(Cell::new(1, 0), Cell::new(0, 0));
        parents.insert(Cell::new(2, 0), Cell::new(1, 0));
        assert_eq!(
            trace_back(&parents, Cell::new(0, 0), Cell::new(2, 0)),
            vec![Cell::new(1, 0), Cell::new(2, 0)]
        );
        assert!(trace_back(&parents, Cell::new(0, 0), Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn occupied_destination_is_reached() {
        let mut grid = Grid::new(5, 1).expect("valid grid");
        block(&mut grid, Cell::new(3, 0));
        let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(3, 0)])
            .expect("valid search")
            .expect("reachable");
        assert_eq!(path.steps().collect::<Vec<_>>(), vec![Cell::new(1, 0), Cell::new(2, 0)]);
    }

    #[test]
    fn destinations_are_not_walked_through() {
        let mut grid = Grid::new(5, 1).expect("valid grid");
        block(&mut grid, Cell::new(2, 0));
        let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(2, 0), Cell::new(4, 0)])
            .expect("valid search")
            .expect("reachable");
        assert_eq!(path.destination(), Cell::new(2, 0));
    }

    #[test]
    fn pop_past_the_end_fails() {
        let mut path = Path::new([Cell::new(1, 0)], Cell::new(2, 0));
        assert_eq!(path.pop_next_step(), Ok(Cell::new(1, 0)));
        assert_eq!(
            path.pop_next_step(),
            Err(PathError::Exhausted {
                destination: Cell::new(2, 0)
            })
        );
    }

    #[test]
    fn display_lists_steps_and_destination() {
        let path = Path::new([Cell::new(1, 0), Cell::new(2, 0)], Cell::new(3, 0));
        assert_eq!(path.to_string(), "[(1, 0), (2, 0)] -> (3, 0)");
    }
}
