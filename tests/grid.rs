//! Behavioural tests for grid occupancy and its preconditions.

use anyhow::{ensure, Result};
use rstest::{fixture, rstest};

use boxworld::{BoxColor, CargoBox, Cell, Entity, EntityKind, Grid, GridError};
use test_utils::{place_box, place_collector};

#[fixture]
fn grid() -> Grid {
    Grid::new(4, 3).unwrap_or_else(|err| panic!("4x3 grid should be valid: {err}"))
}

#[rstest]
fn added_entity_is_found(mut grid: Grid) -> Result<()> {
    let id = place_box(&mut grid, BoxColor::Red, (2, 1))?;
    ensure!(grid.contains(id), "box should be on the grid");
    ensure!(grid.locate(id) == Some(Cell::new(2, 1)), "box should be at (2, 1)");
    ensure!(
        grid.entity_at(Cell::new(2, 1))?.map(Entity::id) == Some(id),
        "cell should hold the box"
    );
    Ok(())
}

#[rstest]
#[case::left(Cell::new(-1, 0))]
#[case::right(Cell::new(4, 0))]
#[case::below(Cell::new(0, -1))]
#[case::above(Cell::new(0, 3))]
fn out_of_range_lookups_fail(grid: Grid, #[case] cell: Cell) {
    assert_eq!(grid.entity_at(cell), Err(GridError::OutOfRange { cell }));
    assert!(!grid.is_passable(cell));
}

#[rstest]
fn rejected_adds_leave_the_grid_unchanged(mut grid: Grid) -> Result<()> {
    let placed = place_box(&mut grid, BoxColor::Blue, (0, 0))?;
    let before = grid.empty_cells();

    let twice = grid.add(
        Entity::Box(CargoBox::new(placed, BoxColor::Blue)),
        Cell::new(1, 1),
    );
    ensure!(
        matches!(twice, Err(GridError::AlreadyPlaced { .. })),
        "re-adding a placed entity should fail, got {twice:?}"
    );

    let fresh = grid.allocate_id();
    let occupied = grid.add(Entity::Box(CargoBox::new(fresh, BoxColor::Red)), Cell::new(0, 0));
    ensure!(
        matches!(occupied, Err(GridError::Occupied { .. })),
        "adding onto an occupied cell should fail, got {occupied:?}"
    );

    let outside = grid.add(Entity::Box(CargoBox::new(fresh, BoxColor::Red)), Cell::new(9, 9));
    ensure!(
        matches!(outside, Err(GridError::OutOfRange { .. })),
        "adding outside the grid should fail, got {outside:?}"
    );

    ensure!(grid.empty_cells() == before, "grid should be unchanged");
    ensure!(!grid.contains(fresh), "rejected entity should not be present");
    Ok(())
}

#[rstest]
fn move_vacates_the_origin(mut grid: Grid) -> Result<()> {
    let id = place_collector(&mut grid, (0, 0))?;
    grid.move_entity(id, Cell::new(0, 0), Cell::new(0, 1))?;
    ensure!(grid.entity_at(Cell::new(0, 0))?.is_none(), "origin should be empty");
    ensure!(
        grid.entity_at(Cell::new(0, 1))? == Some(&Entity::Collector(id)),
        "collector should be at (0, 1)"
    );
    Ok(())
}

#[rstest]
fn remove_requires_the_exact_occupant(mut grid: Grid) -> Result<()> {
    let red = place_box(&mut grid, BoxColor::Red, (1, 1))?;
    let blue = place_box(&mut grid, BoxColor::Blue, (2, 2))?;

    let wrong = grid.remove(blue, Cell::new(1, 1));
    ensure!(
        wrong
            == Err(GridError::RemoveMismatch {
                cell: Cell::new(1, 1),
                expected: blue,
                found: Some(red),
            }),
        "mismatched remove should fail, got {wrong:?}"
    );
    ensure!(grid.contains(red), "red box should still be present");

    let removed = grid.remove(red, Cell::new(1, 1))?;
    ensure!(removed.as_box().map(|cargo| cargo.color) == Some(BoxColor::Red));
    ensure!(!grid.contains(red), "red box should be gone");
    Ok(())
}

#[rstest]
fn kind_queries_split_boxes_from_collectors(mut grid: Grid) -> Result<()> {
    let collector = place_collector(&mut grid, (3, 2))?;
    place_box(&mut grid, BoxColor::Red, (1, 0))?;
    place_box(&mut grid, BoxColor::Blue, (0, 2))?;

    let boxes: Vec<Cell> = grid.boxes().into_keys().collect();
    ensure!(
        boxes == vec![Cell::new(0, 2), Cell::new(1, 0)],
        "boxes should be listed in scan order, got {boxes:?}"
    );
    ensure!(grid.entities_of_kind(EntityKind::Collector).len() == 1);
    ensure!(grid.collectors().get(&Cell::new(3, 2)) == Some(&collector));
    ensure!(grid.empty_cells().len() == 12 - 3);
    Ok(())
}
