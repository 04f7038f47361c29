//! Optional hook for watching a collector's behaviour.
//!
//! A [`Collector`](super::Collector) reports what it does through the `log`
//! facade regardless; an injected [`AgentObserver`] additionally receives
//! structured [`AgentEvent`] values, which tests and front ends use instead
//! of scraping log output.

use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::CargoBox;
use crate::grid::Cell;

use super::state::StateKind;

/// Something a collector did during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    /// The active state changed.
    StateChanged {
        /// State before the transition.
        from: StateKind,
        /// State after the transition.
        to: StateKind,
    },
    /// The collector walked one step.
    Moved {
        /// Cell it left.
        from: Cell,
        /// Cell it entered.
        to: Cell,
    },
    /// A box was lifted off the grid.
    Collected {
        /// The box now being carried.
        cargo: CargoBox,
        /// Cell the box was taken from.
        from: Cell,
    },
    /// The carried box was put down.
    Dropped {
        /// The box that was placed.
        cargo: CargoBox,
        /// Cell it was placed in.
        at: Cell,
    },
    /// No goal could be reached; the collector stops acting.
    Stuck {
        /// Where the collector stopped.
        at: Cell,
    },
}

/// Receiver for [`AgentEvent`]s.
#[cfg_attr(test, mockall::automock)]
pub trait AgentObserver {
    /// Called once per event, in the order the events happen.
    fn on_event(&mut self, event: &AgentEvent);
}

/// Observer that keeps every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<AgentEvent>,
}

impl EventLog {
    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[AgentEvent] {
        &self.events
    }

    /// Removes and returns the recorded events.
    pub fn drain(&mut self) -> Vec<AgentEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AgentObserver for EventLog {
    fn on_event(&mut self, event: &AgentEvent) {
        self.events.push(*event);
    }
}

/// Shared observers let the caller keep a handle on what the collector saw.
impl<T: AgentObserver> AgentObserver for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &AgentEvent) {
        self.borrow_mut().on_event(event);
    }
}
