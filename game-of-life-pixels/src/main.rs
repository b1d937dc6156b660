#![deny(clippy::all)]
#![forbid(unsafe_code)]

use life_grid::{LifeWorld, Random, TickClock, WorldConfig};
use log::{error, info};
use pixels_main_support::{Session, animate};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_WORLD_FILE: &str = "world.txt";
const RANDOM_FILL_RATE: f64 = 0.3;

fn main() -> ExitCode {
    env_logger::init();
    let config = WorldConfig::default();
    let world_file = std::env::args_os().nth(1).map(PathBuf::from);

    let Some(world) = build_world(config, world_file.as_ref()) else {
        return ExitCode::FAILURE;
    };
    let session = Session {
        world,
        clock: TickClock::new(config.ticks_per_sec),
        world_file: world_file.unwrap_or_else(|| PathBuf::from(DEFAULT_WORLD_FILE)),
    };
    match animate(session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event loop failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn build_world(config: WorldConfig, world_file: Option<&PathBuf>) -> Option<LifeWorld> {
    let mut world = match LifeWorld::new(config) {
        Ok(world) => world,
        Err(err) => {
            error!("failed to create world: {}", err);
            return None;
        }
    };
    let loaded = match world_file {
        Some(path) => match world.load_from_file(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!("failed to load {}: {}", path.display(), err);
                return None;
            }
        },
        None => false,
    };
    if !loaded {
        info!("starting from random life");
        world.add_random_life(&mut Random::new(), RANDOM_FILL_RATE);
    }
    Some(world)
}
