//! World mutators that run before the collector each tick.
//!
//! Spawners may only add entities; the collector's interruption handling
//! relies on nothing being moved or removed behind its back.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, SpawnerConfig};
use crate::entity::{BoxColor, CargoBox, Entity};
use crate::grid::{Grid, GridError};

/// Periodic add-only mutation of the grid.
#[cfg_attr(test, mockall::automock)]
pub trait Spawner {
    /// Runs once per tick, before the collector.
    ///
    /// # Errors
    /// Returns [`GridError`] if a placement violates grid preconditions.
    fn advance(&mut self, grid: &mut Grid) -> Result<(), GridError>;
}

/// Drops randomly coloured boxes into random empty cells at random intervals.
#[derive(Debug, Clone)]
pub struct RandomBoxSpawner {
    rng: StdRng,
    min_interval: u32,
    max_interval: u32,
    blue_box_ratio: f64,
    countdown: u32,
}

impl RandomBoxSpawner {
    /// Creates a spawner driven by a generator seeded with `seed`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the interval bounds or colour ratio are
    /// invalid.
    pub fn new(config: &SpawnerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut spawner = Self {
            rng: StdRng::seed_from_u64(seed),
            min_interval: config.min_interval,
            max_interval: config.max_interval,
            blue_box_ratio: config.blue_box_ratio,
            countdown: 0,
        };
        spawner.countdown = spawner.next_interval();
        debug!("box spawner seeded with {seed}, first spawn in {} ticks", spawner.countdown);
        Ok(spawner)
    }

    /// Ticks remaining until the next spawn attempt.
    #[must_use]
    pub const fn ticks_until_spawn(&self) -> u32 {
        self.countdown
    }

    fn next_interval(&mut self) -> u32 {
        self.rng.gen_range(self.min_interval..=self.max_interval)
    }

    fn next_color(&mut self) -> BoxColor {
        if self.rng.gen_bool(self.blue_box_ratio) {
            BoxColor::Blue
        } else {
            BoxColor::Red
        }
    }
}

impl Spawner for RandomBoxSpawner {
    fn advance(&mut self, grid: &mut Grid) -> Result<(), GridError> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Ok(());
        }
        self.countdown = self.next_interval();

        let empty = grid.empty_cells();
        if empty.is_empty() {
            debug!("grid is full, skipping spawn");
            return Ok(());
        }
        let pick = self.rng.gen_range(0..empty.len());
        let Some(&cell) = empty.get(pick) else {
            return Ok(());
        };
        let color = self.next_color();
        let id = grid.allocate_id();
        grid.add(Entity::Box(CargoBox::new(id, color)), cell)?;
        info!("spawned {color} box {id} at {cell}");
        Ok(())
    }
}
