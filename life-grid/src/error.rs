//! Error types for the grid, the world engine and world files.

use crate::grid::GridSize;
use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("cell (col {col}, row {row}) is outside the {}x{} grid", .size.width, .size.height)]
    OutOfDomain { col: i64, row: i64, size: GridSize },

    #[error("failed to allocate grid cells: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("grid extent {width}x{height} cannot be represented")]
    SizeOverflow { width: u64, height: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("row {row} has {found} cells, expected {expected}")]
    UnequalRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid character {byte:#04x} at row {row}, column {col}")]
    InvalidCharacter { row: usize, col: usize, byte: u8 },
}

#[derive(Error, Debug)]
pub enum WorldFileError {
    #[error("malformed world file: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("world file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
