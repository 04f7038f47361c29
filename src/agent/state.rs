//! The collector's behavioural states and their transitions.
//!
//! Each state owns only its local data (countdown, path, target cell).
//! [`AgentState::process`] consumes the current state and yields the next
//! one together with a [`Flow`] telling the driver whether this tick is
//! finished or the new state should be processed straight away.

use std::fmt;

use log::{debug, info, warn};

use crate::entity::Entity;
use crate::grid::{Cell, Grid};
use crate::pathfinding::{find_shortest, Path};
use crate::sorting::{dropoff_cells, find_unsorted_boxes};
use crate::IDLE_TICKS;

use super::context::{AgentTimings, StateContext};
use super::observer::AgentEvent;
use super::AgentError;

/// Tick countdown for timed states.
///
/// The action fires on the tick the count reaches zero, after which the
/// count starts again from the setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    setpoint: u32,
}

impl Countdown {
    /// Starts a countdown of `setpoint` ticks; a zero setpoint counts as one.
    #[must_use]
    pub const fn new(ticks: u32) -> Self {
        let setpoint = if ticks == 0 { 1 } else { ticks };
        Self {
            remaining: setpoint,
            setpoint,
        }
    }

    /// Ticks left before the action fires.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consumes one tick and reports whether the countdown expired.
    pub const fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.setpoint;
            true
        } else {
            false
        }
    }
}

/// Tag naming each state without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Waiting for unsorted boxes.
    Idle,
    /// Planning a route to the nearest unsorted box.
    FindPathToBox,
    /// Walking to a box.
    MoveToBox,
    /// Picking a box up.
    CollectBox,
    /// Planning a route to a drop-off cell.
    FindPathToDropoff,
    /// Walking to a drop-off cell.
    MoveToDropoff,
    /// Putting a box down.
    DropOffBox,
    /// No reachable goal; inert.
    Stuck,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The collector's active behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentState {
    /// Waits out a short timer, then looks for unsorted boxes.
    Idle {
        /// Time until the next look.
        timer: Countdown,
    },
    /// Zero-duration search for the nearest unsorted box.
    FindPathToBox,
    /// Walks one step per expiry of `timer`.
    MoveToBox {
        /// Per-step timer.
        timer: Countdown,
        /// Remaining route to the box.
        path: Path,
    },
    /// Lifts the box at `target` once `timer` expires.
    CollectBox {
        /// Pick-up timer.
        timer: Countdown,
        /// Cell holding the box.
        target: Cell,
    },
    /// Zero-duration search for the nearest drop-off cell.
    FindPathToDropoff,
    /// Walks one step per expiry of `timer` while carrying.
    MoveToDropoff {
        /// Per-step timer.
        timer: Countdown,
        /// Remaining route to the drop-off cell.
        path: Path,
    },
    /// Places the carried box at `target` once `timer` expires.
    DropOffBox {
        /// Put-down timer.
        timer: Countdown,
        /// Cell receiving the box.
        target: Cell,
    },
    /// Never acts again.
    Stuck,
}

/// Whether the driver keeps processing within the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Process the next state within this tick.
    Continue,
    /// The tick has been consumed.
    Complete,
}

/// Outcome of processing one state.
#[derive(Debug)]
pub struct Transition {
    /// State that becomes active.
    pub next: AgentState,
    /// Whether the tick is finished.
    pub flow: Flow,
    /// Side effect to report, if any.
    pub event: Option<AgentEvent>,
}

impl Transition {
    const fn proceed(next: AgentState) -> Self {
        Self {
            next,
            flow: Flow::Continue,
            event: None,
        }
    }

    const fn settle(next: AgentState) -> Self {
        Self {
            next,
            flow: Flow::Complete,
            event: None,
        }
    }

    const fn with_event(mut self, event: AgentEvent) -> Self {
        self.event = Some(event);
        self
    }
}

/// Which half of the fetch-and-sort cycle a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    ToBox,
    ToDropoff,
}

impl Leg {
    const fn step_ticks(self, timings: &AgentTimings) -> u32 {
        match self {
            Self::ToBox => timings.ticks_per_step_without_box(),
            Self::ToDropoff => timings.ticks_per_step_with_box(),
        }
    }

    const fn moving(self, timer: Countdown, path: Path) -> AgentState {
        match self {
            Self::ToBox => AgentState::MoveToBox { timer, path },
            Self::ToDropoff => AgentState::MoveToDropoff { timer, path },
        }
    }

    const fn replan(self) -> AgentState {
        match self {
            Self::ToBox => AgentState::FindPathToBox,
            Self::ToDropoff => AgentState::FindPathToDropoff,
        }
    }

    const fn arrive(self, target: Cell, timings: &AgentTimings) -> AgentState {
        match self {
            Self::ToBox => AgentState::CollectBox {
                timer: Countdown::new(timings.ticks_to_collect_box()),
                target,
            },
            Self::ToDropoff => AgentState::DropOffBox {
                timer: Countdown::new(timings.ticks_to_drop_box()),
                target,
            },
        }
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::idle()
    }
}

impl AgentState {
    /// A fresh idle state.
    #[must_use]
    pub const fn idle() -> Self {
        Self::Idle {
            timer: Countdown::new(IDLE_TICKS),
        }
    }

    /// Tag of this state.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Idle { .. } => StateKind::Idle,
            Self::FindPathToBox => StateKind::FindPathToBox,
            Self::MoveToBox { .. } => StateKind::MoveToBox,
            Self::CollectBox { .. } => StateKind::CollectBox,
            Self::FindPathToDropoff => StateKind::FindPathToDropoff,
            Self::MoveToDropoff { .. } => StateKind::MoveToDropoff,
            Self::DropOffBox { .. } => StateKind::DropOffBox,
            Self::Stuck => StateKind::Stuck,
        }
    }

    /// Route being followed, if the state is walking.
    #[must_use]
    pub const fn path(&self) -> Option<&Path> {
        match self {
            Self::MoveToBox { path, .. } | Self::MoveToDropoff { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Runs this state for the collector standing at `at`.
    ///
    /// # Errors
    /// Propagates grid and path contract violations; these indicate a broken
    /// invariant rather than a simulation outcome.
    pub fn process(
        self,
        ctx: &mut StateContext,
        grid: &mut Grid,
        at: Cell,
    ) -> Result<Transition, AgentError> {
        match self {
            Self::Idle { mut timer } => {
                if !timer.tick() {
                    return Ok(Transition::settle(Self::Idle { timer }));
                }
                let unsorted = find_unsorted_boxes(&ctx.rules, grid);
                if unsorted.is_empty() {
                    Ok(Transition::settle(Self::Idle { timer }))
                } else {
                    debug!("idle collector found {} unsorted boxes", unsorted.len());
                    Ok(Transition::proceed(Self::FindPathToBox))
                }
            }
            Self::FindPathToBox => plan(Leg::ToBox, ctx, grid, at),
            Self::FindPathToDropoff => plan(Leg::ToDropoff, ctx, grid, at),
            Self::MoveToBox { timer, path } => walk(Leg::ToBox, timer, path, ctx, grid, at),
            Self::MoveToDropoff { timer, path } => {
                walk(Leg::ToDropoff, timer, path, ctx, grid, at)
            }
            Self::CollectBox { mut timer, target } => {
                if !timer.tick() {
                    return Ok(Transition::settle(Self::CollectBox { timer, target }));
                }
                collect(ctx, grid, target)
            }
            Self::DropOffBox { mut timer, target } => {
                if !timer.tick() {
                    return Ok(Transition::settle(Self::DropOffBox { timer, target }));
                }
                drop_off(ctx, grid, target)
            }
            Self::Stuck => Ok(Transition::settle(Self::Stuck)),
        }
    }
}

fn plan(
    leg: Leg,
    ctx: &StateContext,
    grid: &Grid,
    at: Cell,
) -> Result<Transition, AgentError> {
    let destinations = match leg {
        Leg::ToBox => find_unsorted_boxes(&ctx.rules, grid),
        Leg::ToDropoff => {
            let cargo = ctx.carried.ok_or(AgentError::MissingCarriedBox)?;
            dropoff_cells(&ctx.rules, grid, cargo.color)
        }
    };

    if destinations.is_empty() {
        return Ok(match leg {
            Leg::ToBox => {
                debug!("no unsorted boxes remain");
                Transition::proceed(AgentState::idle())
            }
            Leg::ToDropoff => {
                warn!("collector at {at} has nowhere to drop its box");
                Transition::proceed(AgentState::Stuck).with_event(AgentEvent::Stuck { at })
            }
        });
    }

    let transition = match find_shortest(grid, at, &destinations)? {
        None => {
            warn!("collector at {at} cannot reach any destination");
            Transition::proceed(AgentState::Stuck).with_event(AgentEvent::Stuck { at })
        }
        Some(path) if path.is_arrived() => {
            debug!("collector at {at} is adjacent to {}", path.destination());
            Transition::proceed(leg.arrive(path.destination(), &ctx.timings))
        }
        Some(path) => {
            debug!(
                "collector at {at} planned {} steps to {}",
                path.steps_remaining(),
                path.destination()
            );
            let timer = Countdown::new(leg.step_ticks(&ctx.timings));
            Transition::proceed(leg.moving(timer, path))
        }
    };
    Ok(transition)
}

fn walk(
    leg: Leg,
    mut timer: Countdown,
    mut path: Path,
    ctx: &StateContext,
    grid: &mut Grid,
    at: Cell,
) -> Result<Transition, AgentError> {
    if !timer.tick() {
        return Ok(Transition::settle(leg.moving(timer, path)));
    }
    if !path.is_passable(grid) {
        debug!("collector at {at} found its route blocked, replanning");
        return Ok(Transition::proceed(leg.replan()));
    }

    let step = path.pop_next_step()?;
    grid.move_entity(ctx.collector, at, step)?;
    let event = AgentEvent::Moved { from: at, to: step };
    let next = if path.is_arrived() {
        debug!("collector reached {}", path.destination());
        leg.arrive(path.destination(), &ctx.timings)
    } else {
        leg.moving(timer, path)
    };
    Ok(Transition::settle(next).with_event(event))
}

fn collect(ctx: &mut StateContext, grid: &mut Grid, target: Cell) -> Result<Transition, AgentError> {
    let Some(box_id) = grid
        .entity_at(target)?
        .and_then(Entity::as_box)
        .map(|cargo| cargo.id)
    else {
        debug!("box at {target} disappeared before pick-up");
        return Ok(Transition::settle(AgentState::idle()));
    };

    let removed = grid.remove(box_id, target)?;
    let cargo = removed.as_box().copied().ok_or(AgentError::MissingCarriedBox)?;
    info!("collector picked up {} box {} at {target}", cargo.color, cargo.id);
    ctx.carried = Some(cargo);
    Ok(Transition::settle(AgentState::FindPathToDropoff)
        .with_event(AgentEvent::Collected { cargo, from: target }))
}

fn drop_off(ctx: &mut StateContext, grid: &mut Grid, target: Cell) -> Result<Transition, AgentError> {
    if grid.entity_at(target)?.is_some() {
        debug!("drop-off cell {target} was filled, looking for another");
        return Ok(Transition::settle(AgentState::FindPathToDropoff));
    }

    let cargo = ctx.carried.ok_or(AgentError::MissingCarriedBox)?;
    grid.add(Entity::Box(cargo), target)?;
    ctx.carried = None;
    info!("collector dropped {} box {} at {target}", cargo.color, cargo.id);
    Ok(Transition::settle(AgentState::idle()).with_event(AgentEvent::Dropped { cargo, at: target }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::single(1, &[true, true, true])]
    #[case::triple(3, &[false, false, true, false, false, true])]
    fn countdown_fires_every_setpoint_ticks(#[case] setpoint: u32, #[case] expected: &[bool]) {
        let mut timer = Countdown::new(setpoint);
        let fired: Vec<bool> = expected.iter().map(|_| timer.tick()).collect();
        assert_eq!(fired, expected);
    }

    #[test]
    fn countdown_treats_zero_as_one() {
        let mut timer = Countdown::new(0);
        assert!(timer.tick());
        assert_eq!(timer.remaining(), 1);
    }

    #[test]
    fn only_walking_states_expose_a_path() {
        let path = Path::new([Cell::new(1, 0)], Cell::new(2, 0));
        let walking = AgentState::MoveToBox {
            timer: Countdown::new(1),
            path: path.clone(),
        };
        assert_eq!(walking.path(), Some(&path));
        assert_eq!(AgentState::idle().path(), None);
        assert_eq!(AgentState::Stuck.kind(), StateKind::Stuck);
    }

    #[test]
    fn failed_drop_keeps_the_box_in_hand() {
        use crate::entity::{BoxColor, CargoBox, EntityId};
        use crate::grid::GridError;
        use crate::sorting::SortingRules;

        let mut grid = Grid::new(3, 1).expect("valid grid");
        let cargo = CargoBox::new(grid.allocate_id(), BoxColor::Red);
        grid.add(Entity::Box(cargo), Cell::new(2, 0))
            .expect("duplicate placed");
        let mut ctx = StateContext::new(
            EntityId(99),
            SortingRules::default(),
            AgentTimings::default(),
        );
        ctx.carried = Some(cargo);

        let dropping = AgentState::DropOffBox {
            timer: Countdown::new(1),
            target: Cell::new(0, 0),
        };
        let result = dropping.process(&mut ctx, &mut grid, Cell::new(1, 0));

        assert!(matches!(
            result,
            Err(AgentError::Grid(GridError::AlreadyPlaced { .. }))
        ));
        assert_eq!(ctx.carried(), Some(&cargo));
        assert_eq!(grid.entity_at(Cell::new(0, 0)), Ok(None));
    }
}
