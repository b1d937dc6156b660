#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Conway's Game of Life on a grid that grows in whole blocks wherever
//! live cells reach its edge.

mod config;
mod error;
mod grid;
mod random;
mod rule;
mod tick;
mod world;
mod world_file;

pub use config::WorldConfig;
pub use error::{GridError, ParseError, WorldFileError};
pub use grid::{CellBuffer, GridSize, Growth, LifeCell, LifeGrid, Loc, Neighborhood, WorldPos};
pub use random::Random;
pub use rule::next_state;
pub use tick::TickClock;
pub use world::{LifeWorld, StepOutcome};
pub use world_file::{parse_world_file, read_file, render_world_file, write_file};
