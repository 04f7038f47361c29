//! Command line front end: runs the simulation and prints each frame.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use boxworld::{init_logging, SimulationConfig, World};
use clap::Parser;
use log::{info, warn};

/// A collector agent sorting coloured boxes on a grid
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 50)]
    ticks: u64,

    /// Override the spawner seed from the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a JSON snapshot per tick instead of an ASCII frame
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = args.config.as_ref().map_or_else(
        || Ok(SimulationConfig::default()),
        |path| {
            SimulationConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))
        },
    )?;
    if let Some(seed) = args.seed {
        config.spawner.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose).context("installing logger")?;

    let config = load_config(&args)?;
    let mut world = World::from_config(&config).context("building world")?;
    let mut out = io::stdout().lock();

    for _ in 0..args.ticks {
        world
            .step()
            .with_context(|| format!("simulating tick {}", world.tick() + 1))?;
        let snapshot = world.snapshot();
        if args.json {
            serde_json::to_writer(&mut out, &snapshot)?;
            writeln!(out)?;
        } else {
            writeln!(out, "tick {}", snapshot.tick)?;
            write!(out, "{snapshot}")?;
        }
        if snapshot.stuck {
            warn!("collector is stuck after {} ticks", snapshot.tick);
            return Ok(());
        }
    }
    info!("simulated {} ticks", world.tick());
    Ok(())
}
