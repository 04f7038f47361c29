//! Data shared by every state of a collector for its whole lifetime.

use crate::config::ConfigError;
use crate::entity::{BoxColor, CargoBox, EntityId};
use crate::sorting::SortingRules;

/// Tick durations for the collector's timed actions.
///
/// Every duration is at least one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTimings {
    ticks_per_step_without_box: u32,
    ticks_per_step_with_box: u32,
    ticks_to_collect_box: u32,
    ticks_to_drop_box: u32,
}

impl Default for AgentTimings {
    fn default() -> Self {
        Self {
            ticks_per_step_without_box: 1,
            ticks_per_step_with_box: 1,
            ticks_to_collect_box: 1,
            ticks_to_drop_box: 1,
        }
    }
}

const fn at_least_one(name: &'static str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidTimer { name, value });
    }
    Ok(value)
}

impl AgentTimings {
    /// Validates and bundles the four durations.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTimer`] naming the first duration that
    /// is zero.
    pub fn new(
        ticks_per_step_without_box: u32,
        ticks_per_step_with_box: u32,
        ticks_to_collect_box: u32,
        ticks_to_drop_box: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            ticks_per_step_without_box: at_least_one(
                "ticks_per_step_without_box",
                ticks_per_step_without_box,
            )?,
            ticks_per_step_with_box: at_least_one(
                "ticks_per_step_with_box",
                ticks_per_step_with_box,
            )?,
            ticks_to_collect_box: at_least_one("ticks_to_collect_box", ticks_to_collect_box)?,
            ticks_to_drop_box: at_least_one("ticks_to_drop_box", ticks_to_drop_box)?,
        })
    }

    /// Ticks per step while walking to a box.
    #[must_use]
    pub const fn ticks_per_step_without_box(&self) -> u32 {
        self.ticks_per_step_without_box
    }

    /// Ticks per step while carrying a box.
    #[must_use]
    pub const fn ticks_per_step_with_box(&self) -> u32 {
        self.ticks_per_step_with_box
    }

    /// Ticks spent picking a box up.
    #[must_use]
    pub const fn ticks_to_collect_box(&self) -> u32 {
        self.ticks_to_collect_box
    }

    /// Ticks spent putting a box down.
    #[must_use]
    pub const fn ticks_to_drop_box(&self) -> u32 {
        self.ticks_to_drop_box
    }
}

/// Context passed by reference into every state transition.
#[derive(Debug, Clone)]
pub struct StateContext {
    pub(crate) collector: EntityId,
    pub(crate) rules: SortingRules,
    pub(crate) timings: AgentTimings,
    pub(crate) carried: Option<CargoBox>,
}

impl StateContext {
    pub(crate) const fn new(
        collector: EntityId,
        rules: SortingRules,
        timings: AgentTimings,
    ) -> Self {
        Self {
            collector,
            rules,
            timings,
            carried: None,
        }
    }

    /// Box currently held by the collector.
    #[must_use]
    pub const fn carried(&self) -> Option<&CargoBox> {
        self.carried.as_ref()
    }

    /// Colour of the held box, if any.
    #[must_use]
    pub fn carried_color(&self) -> Option<BoxColor> {
        self.carried.map(|cargo| cargo.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::step_without_box((0, 1, 1, 1), "ticks_per_step_without_box")]
    #[case::step_with_box((1, 0, 1, 1), "ticks_per_step_with_box")]
    #[case::collect((1, 1, 0, 1), "ticks_to_collect_box")]
    #[case::drop((1, 1, 1, 0), "ticks_to_drop_box")]
    fn zero_durations_are_rejected(#[case] ticks: (u32, u32, u32, u32), #[case] name: &str) {
        let (a, b, c, d) = ticks;
        match AgentTimings::new(a, b, c, d) {
            Err(ConfigError::InvalidTimer { name: found, value: 0 }) => assert_eq!(found, name),
            other => panic!("expected timer rejection, got {other:?}"),
        }
    }

    #[test]
    fn default_timings_are_single_ticks() {
        assert_eq!(
            AgentTimings::new(1, 1, 1, 1).ok(),
            Some(AgentTimings::default())
        );
    }
}
