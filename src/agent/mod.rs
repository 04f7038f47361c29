//! The collector agent.
//!
//! A [`Collector`] pairs its grid identity with a state machine over
//! [`AgentState`]. Each call to [`Collector::advance`] represents one world
//! tick: zero-duration states hand over immediately, and processing stops as
//! soon as a state reports that the tick has been consumed.

mod context;
mod observer;
mod state;

use std::fmt;

use log::debug;
use thiserror::Error;

use crate::entity::{BoxColor, CargoBox, EntityId};
use crate::grid::{Cell, Grid, GridError};
use crate::pathfinding::PathError;
use crate::sorting::SortingRules;
use crate::MAX_TRANSITIONS_PER_TICK;

pub use context::{AgentTimings, StateContext};
#[cfg(test)]
pub use observer::MockAgentObserver;
pub use observer::{AgentEvent, AgentObserver, EventLog};
pub use state::{AgentState, Countdown, Flow, StateKind, Transition};

/// Failures raised while advancing a collector.
///
/// All of these indicate broken invariants; ordinary setbacks such as a box
/// vanishing are handled as state transitions instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// A grid operation was misused.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Path planning was misused.
    #[error(transparent)]
    Path(#[from] PathError),
    /// A carrying state was entered with empty hands.
    #[error("collector expected to be carrying a box")]
    MissingCarriedBox,
    /// The state machine kept handing over without consuming the tick.
    #[error("collector did not settle within {limit} transitions")]
    UnsettledTick {
        /// Transition bound that was exceeded.
        limit: usize,
    },
}

/// The box-sorting agent.
pub struct Collector {
    id: EntityId,
    state: AgentState,
    context: StateContext,
    observer: Option<Box<dyn AgentObserver>>,
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("context", &self.context)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Collector {
    /// Creates an idle collector with empty hands.
    #[must_use]
    pub const fn new(id: EntityId, rules: SortingRules, timings: AgentTimings) -> Self {
        Self {
            id,
            state: AgentState::idle(),
            context: StateContext::new(id, rules, timings),
            observer: None,
        }
    }

    /// Attaches an observer that receives every [`AgentEvent`].
    #[must_use]
    pub fn with_observer(mut self, observer: impl AgentObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Identifier of the collector's marker on the grid.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Tag of the current state.
    #[must_use]
    pub const fn state_kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Whether a box is being carried.
    #[must_use]
    pub const fn has_box(&self) -> bool {
        self.context.carried.is_some()
    }

    /// The carried box, if any.
    #[must_use]
    pub const fn carried(&self) -> Option<&CargoBox> {
        self.context.carried()
    }

    /// Colour of the carried box, if any.
    #[must_use]
    pub fn carried_color(&self) -> Option<BoxColor> {
        self.context.carried_color()
    }

    /// Whether the collector has given up.
    #[must_use]
    pub const fn is_stuck(&self) -> bool {
        matches!(self.state, AgentState::Stuck)
    }

    /// Runs one tick for the collector standing at `start`.
    ///
    /// # Errors
    /// Propagates [`AgentError`] from the active state, or
    /// [`AgentError::UnsettledTick`] if the states keep handing over. After
    /// an error the collector is left [`StateKind::Stuck`].
    pub fn advance(&mut self, grid: &mut Grid, start: Cell) -> Result<(), AgentError> {
        let mut at = start;
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let current = std::mem::replace(&mut self.state, AgentState::Stuck);
            let from = current.kind();
            let Transition { next, flow, event } = current.process(&mut self.context, grid, at)?;

            if let Some(reported) = event {
                if let AgentEvent::Moved { to, .. } = reported {
                    at = to;
                }
                self.notify(&reported);
            }
            let to = next.kind();
            if from != to {
                debug!("collector {} {from} -> {to}", self.id);
                self.notify(&AgentEvent::StateChanged { from, to });
            }
            self.state = next;

            if flow == Flow::Complete {
                return Ok(());
            }
        }
        Err(AgentError::UnsettledTick {
            limit: MAX_TRANSITIONS_PER_TICK,
        })
    }

    fn notify(&mut self, event: &AgentEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(event);
        }
    }
}
