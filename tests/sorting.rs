//! Tests for the column-filling sorting policy.

use anyhow::{ensure, Result};
use rstest::rstest;

use boxworld::{
    boundary_column, dropoff_cells, find_unsorted_boxes, BoxColor, Cell, Grid, Side, SortingRules,
};
use test_utils::{cells, fill_column, place_box};

#[rstest]
fn boxes_on_their_edge_are_sorted() -> Result<()> {
    let mut grid = Grid::new(5, 3)?;
    place_box(&mut grid, BoxColor::Red, (0, 1))?;
    place_box(&mut grid, BoxColor::Blue, (4, 2))?;
    place_box(&mut grid, BoxColor::Red, (3, 0))?;
    place_box(&mut grid, BoxColor::Blue, (1, 1))?;

    let unsorted = find_unsorted_boxes(&SortingRules::default(), &grid);
    ensure!(
        unsorted == cells(&[(1, 1), (3, 0)]),
        "unexpected unsorted boxes {unsorted:?}"
    );
    Ok(())
}

#[rstest]
fn full_edge_column_moves_the_boundary_inward() -> Result<()> {
    let mut grid = Grid::new(5, 3)?;
    fill_column(&mut grid, BoxColor::Red, 0)?;
    place_box(&mut grid, BoxColor::Red, (1, 2))?;
    place_box(&mut grid, BoxColor::Red, (2, 0))?;

    ensure!(boundary_column(&grid, Side::Left) == 1);
    let unsorted = find_unsorted_boxes(&SortingRules::default(), &grid);
    ensure!(unsorted == cells(&[(2, 0)]), "unexpected unsorted boxes {unsorted:?}");

    let dropoffs = dropoff_cells(&SortingRules::default(), &grid, BoxColor::Red);
    ensure!(
        dropoffs == cells(&[(1, 0), (1, 1)]),
        "unexpected drop-off cells {dropoffs:?}"
    );
    Ok(())
}

#[rstest]
fn mixed_colours_still_fill_a_column() -> Result<()> {
    let mut grid = Grid::new(4, 2)?;
    fill_column(&mut grid, BoxColor::Blue, 3)?;
    place_box(&mut grid, BoxColor::Red, (0, 0))?;
    place_box(&mut grid, BoxColor::Blue, (0, 1))?;

    ensure!(boundary_column(&grid, Side::Left) == 1);
    ensure!(boundary_column(&grid, Side::Right) == 2);
    let dropoffs = dropoff_cells(&SortingRules::default(), &grid, BoxColor::Blue);
    ensure!(dropoffs == cells(&[(2, 0), (2, 1)]));
    Ok(())
}

#[rstest]
fn completely_full_side_offers_no_dropoffs() -> Result<()> {
    let mut grid = Grid::new(2, 2)?;
    fill_column(&mut grid, BoxColor::Red, 0)?;
    fill_column(&mut grid, BoxColor::Red, 1)?;

    ensure!(boundary_column(&grid, Side::Left) == 2);
    ensure!(boundary_column(&grid, Side::Right) == -1);
    ensure!(dropoff_cells(&SortingRules::default(), &grid, BoxColor::Red).is_empty());
    ensure!(find_unsorted_boxes(&SortingRules::default(), &grid).is_empty());
    Ok(())
}

#[rstest]
#[case::default_rules(SortingRules::default(), 3)]
#[case::both_left(SortingRules::new(Side::Left, Side::Left), 0)]
fn dropoff_column_follows_rules(#[case] rules: SortingRules, #[case] column: i32) -> Result<()> {
    let grid = Grid::new(4, 2)?;
    let dropoffs = dropoff_cells(&rules, &grid, BoxColor::Blue);
    ensure!(
        dropoffs == vec![Cell::new(column, 0), Cell::new(column, 1)],
        "unexpected drop-off cells {dropoffs:?}"
    );
    Ok(())
}
