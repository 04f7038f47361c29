//! Library crate for the box-sorting grid world.
//!
//! A [`World`] owns a fixed-size [`Grid`] of boxes, the spawners that drop
//! new boxes into it and a single [`Collector`] that fetches each unsorted
//! box and carries it to its colour's side. Everything advances in discrete
//! ticks through [`World::step`].
pub mod agent;
pub mod config;
pub mod constants;
pub mod entity;
pub mod grid;
pub mod logging;
pub mod pathfinding;
pub mod snapshot;
pub mod sorting;
pub mod spawner;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use agent::{
    AgentError, AgentEvent, AgentObserver, AgentState, AgentTimings, Collector, EventLog,
    StateKind,
};
pub use config::{ConfigError, SimulationConfig};
pub use entity::{BoxColor, CargoBox, Entity, EntityId, EntityKind};
pub use grid::{Cell, Direction, Grid, GridError};
pub use logging::init as init_logging;
pub use pathfinding::{find_shortest, Path, PathError};
pub use snapshot::{CellView, WorldSnapshot};
pub use sorting::{boundary_column, dropoff_cells, find_unsorted_boxes, Side, SortingRules};
pub use spawner::{RandomBoxSpawner, Spawner};
pub use world::{World, WorldError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use boxworld::prelude::*;
    //!
    //! let mut world = World::new(10, 1)?;
    //! let id = world.grid_mut().allocate_id();
    //! let collector = Collector::new(id, SortingRules::default(), AgentTimings::default());
    //! world.place_collector(collector, Cell::new(0, 0))?;
    //! let box_id = world.grid_mut().allocate_id();
    //! world
    //!     .grid_mut()
    //!     .add(Entity::Box(CargoBox::new(box_id, BoxColor::Red)), Cell::new(3, 0))?;
    //! world.step()?;
    //! assert_eq!(world.grid().locate(id), Some(Cell::new(1, 0)));
    //! # Ok::<(), Box<dyn std::error::Error>>(())
    //! ```

    pub use crate::{
        AgentTimings, BoxColor, CargoBox, Cell, Collector, Entity, Grid, SortingRules, World,
    };
}
