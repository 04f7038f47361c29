//! Simulation constants shared across modules.

/// Ticks an idle collector waits between looks for unsorted boxes.
pub const IDLE_TICKS: u32 = 1;

/// Upper bound on state hand-overs within a single tick.
///
/// The longest legitimate chain is Idle, FindPath, an interrupted move,
/// FindPath again and a timed state, so this leaves headroom without
/// allowing a runaway loop.
pub const MAX_TRANSITIONS_PER_TICK: usize = 8;

/// Default world width in cells.
pub const DEFAULT_WIDTH: u32 = 10;
/// Default world height in cells.
pub const DEFAULT_HEIGHT: u32 = 10;

/// Default lower bound on ticks between spawned boxes.
pub const DEFAULT_SPAWN_MIN_INTERVAL: u32 = 3;
/// Default upper bound on ticks between spawned boxes.
pub const DEFAULT_SPAWN_MAX_INTERVAL: u32 = 8;
/// Default probability that a spawned box is blue.
pub const DEFAULT_BLUE_BOX_RATIO: f64 = 0.5;
/// Default spawner seed.
pub const DEFAULT_SPAWN_SEED: u64 = 7;
