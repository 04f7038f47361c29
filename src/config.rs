//! Simulation configuration.
//!
//! Settings are read from JSON. Every section and field has a default, so an
//! empty object `{}` is a valid configuration. Values are only trusted once
//! [`SimulationConfig::validate`] has accepted them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::AgentTimings;
use crate::grid::Cell;
use crate::sorting::{Side, SortingRules};
use crate::{
    DEFAULT_BLUE_BOX_RATIO, DEFAULT_HEIGHT, DEFAULT_SPAWN_MAX_INTERVAL,
    DEFAULT_SPAWN_MIN_INTERVAL, DEFAULT_SPAWN_SEED, DEFAULT_WIDTH,
};

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The world has a zero dimension.
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// A collector duration is zero.
    #[error("{name} must be at least one tick, got {value}")]
    InvalidTimer {
        /// Field holding the bad duration.
        name: &'static str,
        /// Configured value.
        value: u32,
    },
    /// The collector would start outside the world.
    #[error("collector start {start} lies outside a {width}x{height} world")]
    StartOutOfRange {
        /// Configured start cell.
        start: Cell,
        /// World width.
        width: u32,
        /// World height.
        height: u32,
    },
    /// Spawn interval bounds are zero or inverted.
    #[error("spawn interval must satisfy 1 <= min <= max, got {min}..={max}")]
    InvalidSpawnInterval {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// The blue probability lies outside `[0, 1]`.
    #[error("blue box ratio must lie in [0, 1], got {0}")]
    InvalidBlueRatio(f64),
}

/// World dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Collector behaviour and starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Side red boxes are sorted towards.
    pub red_sorting_side: Side,
    /// Side blue boxes are sorted towards.
    pub blue_sorting_side: Side,
    /// Ticks per step while walking empty-handed.
    pub ticks_per_step_without_box: u32,
    /// Ticks per step while carrying.
    pub ticks_per_step_with_box: u32,
    /// Ticks to pick a box up.
    pub ticks_to_collect_box: u32,
    /// Ticks to put a box down.
    pub ticks_to_drop_box: u32,
    /// Starting cell as `[x, y]`.
    pub start: (i32, i32),
}

impl Default for CollectorConfig {
    fn default() -> Self {
        let rules = SortingRules::default();
        let timings = AgentTimings::default();
        Self {
            red_sorting_side: rules.red,
            blue_sorting_side: rules.blue,
            ticks_per_step_without_box: timings.ticks_per_step_without_box(),
            ticks_per_step_with_box: timings.ticks_per_step_with_box(),
            ticks_to_collect_box: timings.ticks_to_collect_box(),
            ticks_to_drop_box: timings.ticks_to_drop_box(),
            start: (0, 0),
        }
    }
}

impl CollectorConfig {
    /// Sorting rules described by this section.
    #[must_use]
    pub const fn rules(&self) -> SortingRules {
        SortingRules::new(self.red_sorting_side, self.blue_sorting_side)
    }

    /// Validated action durations.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTimer`] if any duration is zero.
    pub fn timings(&self) -> Result<AgentTimings, ConfigError> {
        AgentTimings::new(
            self.ticks_per_step_without_box,
            self.ticks_per_step_with_box,
            self.ticks_to_collect_box,
            self.ticks_to_drop_box,
        )
    }

    /// Starting cell.
    #[must_use]
    pub const fn start_cell(&self) -> Cell {
        Cell::new(self.start.0, self.start.1)
    }
}

/// Random box spawning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Fewest ticks between spawns.
    pub min_interval: u32,
    /// Most ticks between spawns.
    pub max_interval: u32,
    /// Probability that a spawned box is blue.
    pub blue_box_ratio: f64,
    /// Seed for the spawner's random number generator.
    pub seed: u64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_SPAWN_MIN_INTERVAL,
            max_interval: DEFAULT_SPAWN_MAX_INTERVAL,
            blue_box_ratio: DEFAULT_BLUE_BOX_RATIO,
            seed: DEFAULT_SPAWN_SEED,
        }
    }
}

impl SpawnerConfig {
    /// Checks interval bounds and the colour ratio.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidSpawnInterval`] or
    /// [`ConfigError::InvalidBlueRatio`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval == 0 || self.max_interval < self.min_interval {
            return Err(ConfigError::InvalidSpawnInterval {
                min: self.min_interval,
                max: self.max_interval,
            });
        }
        if !(0.0..=1.0).contains(&self.blue_box_ratio) {
            return Err(ConfigError::InvalidBlueRatio(self.blue_box_ratio));
        }
        Ok(())
    }
}

/// Complete simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World dimensions.
    pub world: WorldConfig,
    /// Collector behaviour.
    pub collector: CollectorConfig,
    /// Box spawning.
    pub spawner: SpawnerConfig,
}

impl SimulationConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed input and any validation
    /// error from [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every section.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WorldConfig { width, height } = self.world;
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        self.collector.timings()?;
        let start = self.collector.start_cell();
        let in_range = u32::try_from(start.x).is_ok_and(|x| x < width)
            && u32::try_from(start.y).is_ok_and(|y| y < height);
        if !in_range {
            return Err(ConfigError::StartOutOfRange {
                start,
                width,
                height,
            });
        }
        self.spawner.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::from_json_str("{}").expect("defaults are valid");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "collector": { "red_sorting_side": "Right", "start": [2, 3] } }"#,
        )
        .expect("valid config");
        assert_eq!(config.collector.red_sorting_side, Side::Right);
        assert_eq!(config.collector.blue_sorting_side, Side::Right);
        assert_eq!(config.collector.start_cell(), Cell::new(2, 3));
        assert_eq!(config.world, WorldConfig::default());
    }

    #[rstest]
    #[case::zero_width(r#"{ "world": { "width": 0 } }"#)]
    #[case::zero_timer(r#"{ "collector": { "ticks_to_drop_box": 0 } }"#)]
    #[case::start_outside(r#"{ "collector": { "start": [10, 0] } }"#)]
    #[case::negative_start(r#"{ "collector": { "start": [0, -1] } }"#)]
    #[case::inverted_interval(r#"{ "spawner": { "min_interval": 5, "max_interval": 2 } }"#)]
    #[case::ratio_too_high(r#"{ "spawner": { "blue_box_ratio": 1.5 } }"#)]
    #[case::unknown_side(r#"{ "collector": { "red_sorting_side": "Up" } }"#)]
    fn invalid_documents_are_rejected(#[case] json: &str) {
        assert!(SimulationConfig::from_json_str(json).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimulationConfig::from_file("/nonexistent/boxworld.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
