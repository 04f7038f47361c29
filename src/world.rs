//! The simulation loop: a grid, its spawners and the collector.

use log::{debug, info};
use thiserror::Error;

use crate::agent::{AgentError, Collector};
use crate::config::{ConfigError, SimulationConfig};
use crate::entity::{Entity, EntityId};
use crate::grid::{Cell, Grid, GridError};
use crate::snapshot::WorldSnapshot;
use crate::spawner::{RandomBoxSpawner, Spawner};

/// Failures while building or stepping a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A grid precondition was violated.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The collector broke one of its invariants.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The collector's marker is no longer on the grid.
    #[error("collector {id} is not on the grid")]
    CollectorMissing {
        /// Identifier of the missing collector.
        id: EntityId,
    },
}

/// A running simulation.
pub struct World {
    grid: Grid,
    spawners: Vec<Box<dyn Spawner>>,
    collector: Option<Collector>,
    tick: u64,
}

impl World {
    /// Creates an empty world with no spawners and no collector.
    ///
    /// # Errors
    /// Returns [`WorldError::Grid`] for zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            spawners: Vec::new(),
            collector: None,
            tick: 0,
        })
    }

    /// Builds a world with a random box spawner and a collector at its
    /// configured start.
    ///
    /// # Errors
    /// Returns [`WorldError::Config`] if the configuration is invalid.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let mut world = Self::new(config.world.width, config.world.height)?;
        world.add_spawner(Box::new(RandomBoxSpawner::new(
            &config.spawner,
            config.spawner.seed,
        )?));
        let id = world.grid.allocate_id();
        let collector = Collector::new(id, config.collector.rules(), config.collector.timings()?);
        world.place_collector(collector, config.collector.start_cell())?;
        info!(
            "world {}x{} ready, collector at {}",
            config.world.width,
            config.world.height,
            config.collector.start_cell()
        );
        Ok(world)
    }

    /// Registers a spawner; spawners run in registration order.
    pub fn add_spawner(&mut self, spawner: Box<dyn Spawner>) {
        self.spawners.push(spawner);
    }

    /// Puts `collector` on the grid at `cell`, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`WorldError::Grid`] if `cell` is out of range or occupied.
    pub fn place_collector(&mut self, collector: Collector, cell: Cell) -> Result<(), WorldError> {
        if let Some(previous) = self.collector.take() {
            if let Some(at) = self.grid.locate(previous.id()) {
                self.grid.remove(previous.id(), at)?;
            }
        }
        self.grid.add(Entity::Collector(collector.id()), cell)?;
        self.collector = Some(collector);
        Ok(())
    }

    /// Runs one tick: every spawner, then the collector.
    ///
    /// # Errors
    /// Propagates spawner and collector failures, or
    /// [`WorldError::CollectorMissing`] if the collector's marker vanished.
    pub fn step(&mut self) -> Result<(), WorldError> {
        for spawner in &mut self.spawners {
            spawner.advance(&mut self.grid)?;
        }
        if let Some(collector) = self.collector.as_mut() {
            let id = collector.id();
            let at = self
                .grid
                .locate(id)
                .ok_or(WorldError::CollectorMissing { id })?;
            collector.advance(&mut self.grid, at)?;
        }
        self.tick += 1;
        debug!("tick {} complete", self.tick);
        Ok(())
    }

    /// The occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access for setting up scenarios between ticks.
    pub const fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// The collector, if one is placed.
    #[must_use]
    pub const fn collector(&self) -> Option<&Collector> {
        self.collector.as_ref()
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Captures the current state for display.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::capture(self.tick, &self.grid);
        if let Some(collector) = &self.collector {
            snapshot.collector = self.grid.locate(collector.id());
            snapshot.carrying = collector.carried_color();
            snapshot.stuck = collector.is_stuck();
        }
        snapshot
    }
}
