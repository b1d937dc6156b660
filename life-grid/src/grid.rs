//! Double-buffered cell storage that grows in whole blocks.
//!
//! All accessors here take local coordinates: `Loc { row: 0, col: 0 }` is
//! the top-left cell of the current buffer. [`LifeGrid::origin`] gives the
//! world position of that cell, and moves up/left when the grid grows on
//! those sides.

use crate::error::GridError;
use log::debug;
use std::mem;
use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, loc: Loc) -> bool {
        loc.row < self.height && loc.col < self.width
    }

    fn grown_by(&self, growth: Growth, block_size: GridSize) -> Result<GridSize, GridError> {
        let extra_rows =
            (u64::from(growth.top) + u64::from(growth.bottom)) * u64::from(block_size.height);
        let extra_cols =
            (u64::from(growth.left) + u64::from(growth.right)) * u64::from(block_size.width);
        let width = u64::from(self.width) + extra_cols;
        let height = u64::from(self.height) + extra_rows;
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(width), Ok(height)) => Ok(GridSize::new(width, height)),
            _ => Err(GridError::SizeOverflow { width, height }),
        }
    }
}

/// Local grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, size: GridSize) -> Option<usize> {
        if size.contains(*self) {
            Some(self.row as usize * size.width as usize + self.col as usize)
        } else {
            None
        }
    }

    fn offset(&self, row_delta: i64, col_delta: i64) -> Option<Loc> {
        let row = u32::try_from(i64::from(self.row) + row_delta).ok()?;
        let col = u32::try_from(i64::from(self.col) + col_delta).ok()?;
        Some(Loc::new(row, col))
    }
}

/// World coordinate, stable across growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldPos {
    pub x: i64,
    pub y: i64,
}

impl WorldPos {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Whole blocks to add on each side of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Growth {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Growth {
    pub const NONE: Growth = Growth {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifeCell {
    pub alive: bool,
}

impl LifeCell {
    pub const DEAD: LifeCell = LifeCell { alive: false };
    pub const ALIVE: LifeCell = LifeCell { alive: true };

    pub fn toggle(&mut self) {
        self.alive = !self.alive;
    }
}

/// Row-major rectangle of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellBuffer {
    cells: Vec<LifeCell>,
    size: GridSize,
}

impl CellBuffer {
    /// Allocates an all-dead buffer, reporting allocation failure instead of aborting.
    pub fn new(size: GridSize) -> Result<Self, GridError> {
        assert!(size.width > 0 && size.height > 0);
        let mut cells = Vec::new();
        cells.try_reserve_exact(size.num_cells())?;
        cells.resize(size.num_cells(), LifeCell::DEAD);
        Ok(Self { cells, size })
    }

    pub(crate) fn from_cells(size: GridSize, cells: Vec<LifeCell>) -> Self {
        assert!(size.width > 0 && size.height > 0);
        assert_eq!(cells.len(), size.num_cells());
        Self { cells, size }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &LifeCell> + Clone {
        self.cells.iter()
    }

    pub fn cells_iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut LifeCell> {
        self.cells.iter_mut()
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[LifeCell]> {
        self.cells.chunks_exact(self.size.width as usize)
    }

    pub fn cell(&self, loc: Loc) -> Option<&LifeCell> {
        loc.grid_index(self.size).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut LifeCell> {
        loc.grid_index(self.size)
            .map(|index| &mut self.cells[index])
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(LifeCell::DEAD);
    }

    /// Copies this buffer into `target` so that our top-left cell lands on
    /// `offset`. Whatever does not fit in `target` is dropped.
    pub fn copy_into(&self, target: &mut CellBuffer, offset: Loc) {
        if !target.size.contains(offset) {
            return;
        }
        let width = self.size.width.min(target.size.width - offset.col) as usize;
        let rows = (target.size.height - offset.row) as usize;
        let target_width = target.size.width as usize;
        for (row, source_row) in self.rows_iter().take(rows).enumerate() {
            let start = (offset.row as usize + row) * target_width + offset.col as usize;
            target.cells[start..start + width].copy_from_slice(&source_row[..width]);
        }
    }
}

impl Index<Loc> for CellBuffer {
    type Output = LifeCell;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl IndexMut<Loc> for CellBuffer {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

/// The eight cells around `center`. Neighbors off the edge of the buffer
/// are skipped, so they count as dead.
pub struct Neighborhood<'a> {
    cells: &'a CellBuffer,
    center: Loc,
}

impl<'a> Neighborhood<'a> {
    const OFFSETS: [(i64, i64); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    pub fn new(cells: &'a CellBuffer, center: Loc) -> Self {
        Self { cells, center }
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&LifeCell),
    {
        for (row_delta, col_delta) in Self::OFFSETS {
            if let Some(cell) = self
                .center
                .offset(row_delta, col_delta)
                .and_then(|loc| self.cells.cell(loc))
            {
                f(cell);
            }
        }
    }

    pub fn num_live_neighbors(&self) -> u32 {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if neighbor.alive {
                result += 1;
            }
        });
        result
    }
}

/// Current and next generation buffers plus the world position of the
/// top-left cell.
#[derive(Clone, Debug)]
pub struct LifeGrid {
    cells: CellBuffer,
    next_cells: CellBuffer,
    origin: WorldPos,
    block_size: GridSize,
}

impl LifeGrid {
    /// One all-dead block, with its top-left cell at world (0, 0).
    pub fn new(block_size: GridSize) -> Result<Self, GridError> {
        assert!(block_size.width > 0 && block_size.height > 0);
        Ok(Self {
            cells: CellBuffer::new(block_size)?,
            next_cells: CellBuffer::new(block_size)?,
            origin: WorldPos::default(),
            block_size,
        })
    }

    pub fn size(&self) -> GridSize {
        self.cells.size()
    }

    pub fn rows(&self) -> u32 {
        self.size().height
    }

    pub fn cols(&self) -> u32 {
        self.size().width
    }

    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    pub fn block_size(&self) -> GridSize {
        self.block_size
    }

    pub fn num_cells(&self) -> usize {
        self.cells.num_cells()
    }

    pub fn cells(&self) -> &CellBuffer {
        &self.cells
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &LifeCell> + Clone {
        self.cells.cells_iter()
    }

    pub fn cell(&self, loc: Loc) -> Result<&LifeCell, GridError> {
        let size = self.size();
        self.cells.cell(loc).ok_or_else(|| out_of_domain(loc, size))
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Result<&mut LifeCell, GridError> {
        let size = self.size();
        self.cells.cell_mut(loc).ok_or_else(|| out_of_domain(loc, size))
    }

    /// Bounded by the next buffer's own extent, which trails the current
    /// one until [`Self::grow_next_to_match`] runs.
    pub fn next_cell_mut(&mut self, loc: Loc) -> Result<&mut LifeCell, GridError> {
        let size = self.next_cells.size();
        self.next_cells
            .cell_mut(loc)
            .ok_or_else(|| out_of_domain(loc, size))
    }

    /// Flips the cell and returns its new state.
    pub fn toggle(&mut self, loc: Loc) -> Result<bool, GridError> {
        let cell = self.cell_mut(loc)?;
        cell.toggle();
        Ok(cell.alive)
    }

    pub fn to_local(&self, pos: WorldPos) -> Result<Loc, GridError> {
        let col = pos.x - self.origin.x;
        let row = pos.y - self.origin.y;
        let size = self.size();
        match (u32::try_from(row), u32::try_from(col)) {
            (Ok(r), Ok(c)) if size.contains(Loc::new(r, c)) => Ok(Loc::new(r, c)),
            _ => Err(GridError::OutOfDomain { col, row, size }),
        }
    }

    pub fn to_world(&self, loc: Loc) -> WorldPos {
        WorldPos::new(
            self.origin.x + i64::from(loc.col),
            self.origin.y + i64::from(loc.row),
        )
    }

    /// Enlarges the current buffer by whole blocks on each side, keeping
    /// every cell at its world position. Growth on the top or left moves
    /// the origin. On failure the grid is unchanged.
    pub fn grow_by(&mut self, growth: Growth) -> Result<(), GridError> {
        if growth.is_none() {
            return Ok(());
        }
        let size = self.size().grown_by(growth, self.block_size)?;
        let mut cells = CellBuffer::new(size)?;
        let shift = Loc::new(
            growth.top * self.block_size.height,
            growth.left * self.block_size.width,
        );
        self.cells.copy_into(&mut cells, shift);
        self.cells = cells;
        self.origin = WorldPos::new(
            self.origin.x - i64::from(shift.col),
            self.origin.y - i64::from(shift.row),
        );
        debug!(
            "grew {:?} to {}x{}, origin now ({}, {})",
            growth, size.width, size.height, self.origin.x, self.origin.y
        );
        Ok(())
    }

    /// Reallocates the next buffer, all dead, at the current buffer's extent.
    pub fn grow_next_to_match(&mut self) -> Result<(), GridError> {
        if self.next_cells.size() != self.size() {
            self.next_cells = CellBuffer::new(self.size())?;
        }
        Ok(())
    }

    /// Blocks to add below and to the right so that a `size` rectangle
    /// anchored at the top-left fits.
    pub fn blocks_to_fit(&self, size: GridSize) -> Growth {
        Growth {
            bottom: size
                .height
                .saturating_sub(self.rows())
                .div_ceil(self.block_size.height),
            right: size
                .width
                .saturating_sub(self.cols())
                .div_ceil(self.block_size.width),
            ..Growth::NONE
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn cells_mut(&mut self) -> &mut CellBuffer {
        &mut self.cells
    }

    pub(crate) fn next_size(&self) -> GridSize {
        self.next_cells.size()
    }

    pub(crate) fn buffers_mut(&mut self) -> (&CellBuffer, &mut CellBuffer) {
        (&self.cells, &mut self.next_cells)
    }

    /// Moves the next generation into the current buffer, its top-left at
    /// `offset`, and leaves the next buffer all dead.
    pub(crate) fn commit_next(&mut self, offset: Loc) {
        if offset == Loc::default() && self.next_cells.size() == self.cells.size() {
            mem::swap(&mut self.cells, &mut self.next_cells);
        } else {
            self.next_cells.copy_into(&mut self.cells, offset);
        }
        self.next_cells.clear();
    }

    pub(crate) fn clear_next(&mut self) {
        self.next_cells.clear();
    }
}

fn out_of_domain(loc: Loc, size: GridSize) -> GridError {
    GridError::OutOfDomain {
        col: i64::from(loc.col),
        row: i64::from(loc.row),
        size,
    }
}
