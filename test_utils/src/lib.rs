//! Utility helpers for building grid scenarios in tests.

use anyhow::{Context, Result};
use boxworld::{
    AgentTimings, BoxColor, CargoBox, Cell, Collector, Entity, EntityId, Grid, SortingRules,
};

/// A grid with a collector placed on it.
#[derive(Debug)]
pub struct Scenario {
    /// The occupancy grid.
    pub grid: Grid,
    /// The collector standing on `grid`.
    pub collector: Collector,
}

impl Scenario {
    /// Creates a `width` by `height` grid with a default collector at `start`.
    ///
    /// # Errors
    /// Fails if the grid is invalid or `start` is out of range.
    pub fn new(width: u32, height: u32, start: (i32, i32)) -> Result<Self> {
        let mut grid = Grid::new(width, height).context("building grid")?;
        let id = place_collector(&mut grid, start)?;
        Ok(Self {
            grid,
            collector: Collector::new(id, SortingRules::default(), AgentTimings::default()),
        })
    }

    /// Replaces the collector, keeping its grid marker.
    #[must_use]
    pub fn with_collector(mut self, build: impl FnOnce(EntityId) -> Collector) -> Self {
        self.collector = build(self.collector.id());
        self
    }

    /// Adds a box of `color` at `at`.
    ///
    /// # Errors
    /// Fails if the cell is occupied or out of range.
    pub fn place_box(&mut self, color: BoxColor, at: (i32, i32)) -> Result<EntityId> {
        place_box(&mut self.grid, color, at)
    }

    /// Where the collector currently stands.
    ///
    /// # Errors
    /// Fails if the collector marker is missing from the grid.
    pub fn collector_cell(&self) -> Result<Cell> {
        self.grid
            .locate(self.collector.id())
            .context("collector marker missing from grid")
    }

    /// Advances the collector by `ticks` ticks.
    ///
    /// # Errors
    /// Propagates the first collector failure.
    pub fn run(&mut self, ticks: usize) -> Result<()> {
        for _ in 0..ticks {
            let at = self.collector_cell()?;
            self.collector
                .advance(&mut self.grid, at)
                .with_context(|| format!("advancing collector at {at}"))?;
        }
        Ok(())
    }

    /// Colour of the box at `at`, if there is one.
    ///
    /// # Errors
    /// Fails if `at` is out of range.
    pub fn box_color_at(&self, at: (i32, i32)) -> Result<Option<BoxColor>> {
        Ok(self
            .grid
            .entity_at(at.into())?
            .and_then(Entity::as_box)
            .map(|cargo| cargo.color))
    }
}

/// Places a collector marker on `grid`.
///
/// # Errors
/// Fails if the cell is occupied or out of range.
pub fn place_collector(grid: &mut Grid, at: (i32, i32)) -> Result<EntityId> {
    let id = grid.allocate_id();
    grid.add(Entity::Collector(id), at.into())
        .with_context(|| format!("placing collector at {at:?}"))?;
    Ok(id)
}

/// Places a box on `grid`.
///
/// # Errors
/// Fails if the cell is occupied or out of range.
pub fn place_box(grid: &mut Grid, color: BoxColor, at: (i32, i32)) -> Result<EntityId> {
    let id = grid.allocate_id();
    grid.add(Entity::Box(CargoBox::new(id, color)), at.into())
        .with_context(|| format!("placing {color} box at {at:?}"))?;
    Ok(id)
}

/// Fills every cell in `column` with boxes of `color`.
///
/// # Errors
/// Fails if any cell in the column is occupied.
pub fn fill_column(grid: &mut Grid, color: BoxColor, column: i32) -> Result<()> {
    for row in 0..grid.height() {
        place_box(grid, color, (column, row))?;
    }
    Ok(())
}

/// Shorthand for a list of cells.
#[must_use]
pub fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
    coords.iter().copied().map(Cell::from).collect()
}
