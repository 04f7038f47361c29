//! Read-only views of the world for presentation.

use std::fmt;

use serde::Serialize;

use crate::entity::{BoxColor, Entity};
use crate::grid::{Cell, Grid};

/// What a single cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellView {
    /// Nothing here.
    Empty,
    /// A red box.
    RedBox,
    /// A blue box.
    BlueBox,
    /// The collector.
    Collector,
}

impl From<Option<&Entity>> for CellView {
    fn from(entity: Option<&Entity>) -> Self {
        match entity {
            None => Self::Empty,
            Some(Entity::Box(cargo)) => match cargo.color {
                BoxColor::Red => Self::RedBox,
                BoxColor::Blue => Self::BlueBox,
            },
            Some(Entity::Collector(_)) => Self::Collector,
        }
    }
}

/// The world as it stood at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSnapshot {
    /// Ticks completed so far.
    pub tick: u64,
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
    /// Cell contents, top row first, each row left to right.
    pub rows: Vec<Vec<CellView>>,
    /// Where the collector stands, if one is placed.
    pub collector: Option<Cell>,
    /// Colour of the box the collector carries.
    pub carrying: Option<BoxColor>,
    /// Whether the collector has given up.
    pub stuck: bool,
}

impl WorldSnapshot {
    /// Captures the grid; collector details are filled in by the caller.
    #[must_use]
    pub fn capture(tick: u64, grid: &Grid) -> Self {
        let rows = (0..grid.height())
            .rev()
            .map(|y| {
                (0..grid.width())
                    .map(|x| CellView::from(grid.entity_at(Cell::new(x, y)).ok().flatten()))
                    .collect()
            })
            .collect();
        Self {
            tick,
            width: grid.width(),
            height: grid.height(),
            rows,
            collector: grid.collectors().into_keys().next(),
            carrying: None,
            stuck: false,
        }
    }

    /// Number of cells showing `view`.
    #[must_use]
    pub fn count(&self, view: CellView) -> usize {
        self.rows.iter().flatten().filter(|&&cell| cell == view).count()
    }

    const fn glyph(&self, view: CellView) -> char {
        match view {
            CellView::Empty => '.',
            CellView::RedBox => 'R',
            CellView::BlueBox => 'B',
            CellView::Collector => match self.carrying {
                None => 'C',
                Some(BoxColor::Red) => 'r',
                Some(BoxColor::Blue) => 'b',
            },
        }
    }
}

impl fmt::Display for WorldSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for &view in row {
                write!(f, "{}", self.glyph(view))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
