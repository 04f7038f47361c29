//! Colour sorting rules and the column-filling policy.
//!
//! Each colour is sorted towards one side of the world. Boxes fill the
//! outermost column on that side first; once it is packed with boxes the
//! next column inward becomes the target, and so on. The first column (from
//! the side inward) that still has a non-box cell is the *boundary column*.
//! A box is sorted when it sits in or beyond its colour's boundary column,
//! and new drop-offs go into the boundary column's free cells.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::entity::BoxColor;
use crate::grid::{Cell, Grid};

/// Edge of the world a colour is sorted towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Column zero.
    Left,
    /// The last column.
    Right,
}

/// Mapping from box colour to target side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingRules {
    /// Side red boxes are sorted towards.
    pub red: Side,
    /// Side blue boxes are sorted towards.
    pub blue: Side,
}

impl Default for SortingRules {
    fn default() -> Self {
        Self {
            red: Side::Left,
            blue: Side::Right,
        }
    }
}

impl SortingRules {
    /// Creates a rule set.
    #[must_use]
    pub const fn new(red: Side, blue: Side) -> Self {
        Self { red, blue }
    }

    /// Side the given colour is sorted towards.
    #[must_use]
    pub const fn side_for(&self, color: BoxColor) -> Side {
        match color {
            BoxColor::Red => self.red,
            BoxColor::Blue => self.blue,
        }
    }
}

fn is_column_full(grid: &Grid, column: i32) -> bool {
    (0..grid.height()).all(|row| {
        matches!(grid.entity_at(Cell::new(column, row)), Ok(Some(entity)) if entity.is_box())
    })
}

/// First column, scanning inward from `side`, that is not packed with boxes.
///
/// When every column is full the result lies one past the far edge: `width`
/// for [`Side::Left`] and `-1` for [`Side::Right`].
#[must_use]
pub fn boundary_column(grid: &Grid, side: Side) -> i32 {
    let boundary = match side {
        Side::Left => (0..grid.width())
            .find(|&column| !is_column_full(grid, column))
            .unwrap_or(grid.width()),
        Side::Right => (0..grid.width())
            .rev()
            .find(|&column| !is_column_full(grid, column))
            .unwrap_or(-1),
    };
    trace!("boundary column on the {side:?} side is {boundary}");
    boundary
}

const fn is_sorted(side: Side, column: i32, boundary: i32) -> bool {
    match side {
        Side::Left => column <= boundary,
        Side::Right => column >= boundary,
    }
}

/// Cells of every box that sits inside its colour's boundary column.
///
/// Results are in grid scan order.
#[must_use]
pub fn find_unsorted_boxes(rules: &SortingRules, grid: &Grid) -> Vec<Cell> {
    let boundaries = BoxColor::ALL.map(|color| {
        let side = rules.side_for(color);
        (color, side, boundary_column(grid, side))
    });

    let unsorted: Vec<Cell> = grid
        .boxes()
        .into_iter()
        .filter(|(cell, cargo)| {
            boundaries
                .iter()
                .find(|(color, _, _)| *color == cargo.color)
                .is_some_and(|&(_, side, boundary)| !is_sorted(side, cell.x, boundary))
        })
        .map(|(cell, _)| cell)
        .collect();
    trace!("{} unsorted boxes found", unsorted.len());
    unsorted
}

/// Free cells where a box of `color` may currently be dropped.
///
/// These are the non-box cells of the colour's boundary column in row
/// order. The result is empty when that side of the world is completely
/// full.
#[must_use]
pub fn dropoff_cells(rules: &SortingRules, grid: &Grid, color: BoxColor) -> Vec<Cell> {
    let column = boundary_column(grid, rules.side_for(color));
    if !(0..grid.width()).contains(&column) {
        trace!("no {color} drop-off column available");
        return Vec::new();
    }
    let cells: Vec<Cell> = (0..grid.height())
        .map(|row| Cell::new(column, row))
        .filter(|&cell| !matches!(grid.entity_at(cell), Ok(Some(entity)) if entity.is_box()))
        .collect();
    trace!("{} {color} drop-off cells in column {column}", cells.len());
    cells
}
