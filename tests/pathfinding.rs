//! Tests for breadth-first route planning.

use anyhow::{ensure, Context, Result};
use rstest::rstest;

use boxworld::{find_shortest, BoxColor, Cell, Grid, PathError};
use test_utils::{cells, place_box};

#[rstest]
fn straight_line_on_an_empty_grid() -> Result<()> {
    let grid = Grid::new(10, 10)?;
    let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(4, 0)])?
        .context("destination should be reachable")?;

    ensure!(path.destination() == Cell::new(4, 0));
    ensure!(
        path.steps().collect::<Vec<_>>() == cells(&[(1, 0), (2, 0), (3, 0)]),
        "unexpected route {path}"
    );
    ensure!(path.is_passable(&grid));
    Ok(())
}

#[rstest]
fn detours_around_a_wall() -> Result<()> {
    let mut grid = Grid::new(10, 10)?;
    for at in [(1, 0), (1, 1), (1, 2)] {
        place_box(&mut grid, BoxColor::Blue, at)?;
    }

    let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(2, 0)])?
        .context("destination should be reachable")?;

    ensure!(
        path.steps().collect::<Vec<_>>()
            == cells(&[(0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (2, 2), (2, 1)]),
        "unexpected route {path}"
    );
    ensure!(path.steps_remaining() == 7);
    ensure!(path.is_passable(&grid));
    Ok(())
}

#[rstest]
#[case::up_beats_right(&[(5, 7), (7, 5)], (5, 7))]
#[case::left_beats_right(&[(3, 5), (7, 5)], (3, 5))]
#[case::down_beats_left(&[(5, 3), (3, 5)], (5, 3))]
#[case::nearest_wins(&[(5, 9), (6, 5)], (6, 5))]
fn equidistant_ties_follow_neighbour_order(
    #[case] destinations: &[(i32, i32)],
    #[case] expected: (i32, i32),
) -> Result<()> {
    let grid = Grid::new(10, 10)?;
    for _ in 0..3 {
        let path = find_shortest(&grid, Cell::new(5, 5), &cells(destinations))?
            .context("destinations should be reachable")?;
        ensure!(
            path.destination() == Cell::from(expected),
            "expected {expected:?}, got {}",
            path.destination()
        );
    }
    Ok(())
}

#[rstest]
fn adjacent_destination_needs_no_steps() -> Result<()> {
    let mut grid = Grid::new(3, 3)?;
    place_box(&mut grid, BoxColor::Red, (1, 2))?;
    let path = find_shortest(&grid, Cell::new(1, 1), &[Cell::new(1, 2)])?
        .context("destination should be reachable")?;
    ensure!(path.is_arrived(), "expected an empty route, got {path}");
    Ok(())
}

#[rstest]
fn enclosed_destination_is_unreachable() -> Result<()> {
    let mut grid = Grid::new(5, 5)?;
    for at in [(3, 4), (3, 3), (4, 3)] {
        place_box(&mut grid, BoxColor::Red, at)?;
    }
    let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(4, 4)])?;
    ensure!(path.is_none(), "expected no route, got {path:?}");
    Ok(())
}

#[rstest]
fn interruption_is_detected() -> Result<()> {
    let mut grid = Grid::new(10, 1)?;
    let path = find_shortest(&grid, Cell::new(0, 0), &[Cell::new(6, 0)])?
        .context("destination should be reachable")?;
    place_box(&mut grid, BoxColor::Blue, (3, 0))?;
    ensure!(!path.is_passable(&grid), "route through (3, 0) should be blocked");
    Ok(())
}

#[rstest]
fn caller_errors_are_reported() -> Result<()> {
    let grid = Grid::new(3, 3)?;
    ensure!(
        find_shortest(&grid, Cell::new(0, 0), &[]) == Err(PathError::NoDestinations),
        "empty destination list should be rejected"
    );
    ensure!(
        find_shortest(&grid, Cell::new(3, 0), &[Cell::new(0, 0)])
            == Err(PathError::OriginOutOfRange {
                origin: Cell::new(3, 0)
            }),
        "out-of-range origin should be rejected"
    );
    Ok(())
}
