//! Plain-text world files: one row per line, `'1'` alive, `'0'` dead.
//!
//! ```text
//! 00000
//! 01110
//! 00000
//! ```
//!
//! Rows end with `'\n'`; the last one may omit it when read but always has
//! it when written. Every row must be as long as the first.

use crate::config::WorldConfig;
use crate::error::{ParseError, WorldFileError};
use crate::grid::{CellBuffer, GridSize, LifeCell, Loc};
use crate::world::LifeWorld;
use log::{info, warn};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Parses a whole world file before anything is written to a grid.
///
/// Returns `None` when there are no cells to load.
pub fn parse_world_file(bytes: &[u8]) -> Result<Option<CellBuffer>, ParseError> {
    let num_cols = bytes.iter().position(|&byte| byte == b'\n').unwrap_or(bytes.len());
    let mut cells = Vec::with_capacity(bytes.len());
    let (mut row, mut col) = (0, 0);
    for &byte in bytes {
        match byte {
            b'\n' => {
                check_row_length(row, num_cols, col)?;
                row += 1;
                col = 0;
                continue;
            }
            b'0' => cells.push(LifeCell::DEAD),
            b'1' => cells.push(LifeCell::ALIVE),
            _ => return Err(ParseError::InvalidCharacter { row, col, byte }),
        }
        col += 1;
    }
    let num_rows = if col > 0 {
        check_row_length(row, num_cols, col)?;
        row + 1
    } else {
        row
    };

    if num_cols == 0 || num_rows == 0 {
        return Ok(None);
    }
    let size = GridSize::new(num_cols as u32, num_rows as u32);
    Ok(Some(CellBuffer::from_cells(size, cells)))
}

fn check_row_length(row: usize, expected: usize, found: usize) -> Result<(), ParseError> {
    if found == expected {
        Ok(())
    } else {
        Err(ParseError::UnequalRowLength {
            row,
            expected,
            found,
        })
    }
}

/// Renders every row of `cells`, each terminated by `'\n'`.
pub fn render_world_file(cells: &CellBuffer) -> Vec<u8> {
    let size = cells.size();
    let mut result = Vec::with_capacity((size.width as usize + 1) * size.height as usize);
    for row in cells.rows_iter() {
        result.extend(row.iter().map(|cell| if cell.alive { b'1' } else { b'0' }));
        result.push(b'\n');
    }
    result
}

/// Reads at most `max_bytes` of `path`. Any failure yields no bytes.
pub fn read_file(path: impl AsRef<Path>, max_bytes: usize) -> Vec<u8> {
    let path = path.as_ref();
    let mut contents = vec![];
    let result = File::open(path)
        .and_then(|file| file.take(max_bytes as u64).read_to_end(&mut contents));
    match result {
        Ok(bytes) => {
            if bytes == max_bytes {
                warn!("reached max size of {} bytes reading {}", max_bytes, path.display());
            }
            contents
        }
        Err(err) => {
            warn!("failed to read {}: {}", path.display(), err);
            vec![]
        }
    }
}

/// Writes `bytes` to `path`, replacing any existing file.
pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    std::fs::write(path, bytes)
}

impl LifeWorld {
    pub fn from_world_file(bytes: &[u8], config: WorldConfig) -> Result<Self, WorldFileError> {
        let mut world = Self::new(config)?;
        world.load(bytes)?;
        Ok(world)
    }

    /// Replaces the grid's cells with a world file, anchored at the
    /// current top-left cell. The grid grows down and right, in whole
    /// blocks, when the file does not fit; the origin never moves.
    ///
    /// Returns `false` if `bytes` held no cells. A malformed file leaves
    /// the world untouched.
    pub fn load(&mut self, bytes: &[u8]) -> Result<bool, WorldFileError> {
        let Some(loaded) = parse_world_file(bytes)? else {
            return Ok(false);
        };
        let size = loaded.size();
        let grid = self.grid_mut();
        let growth = grid.blocks_to_fit(size);
        grid.grow_by(growth)?;
        grid.grow_next_to_match()?;
        grid.clear();
        loaded.copy_into(grid.cells_mut(), Loc::default());
        info!(
            "loaded {}x{} world file into {}x{} grid",
            size.width,
            size.height,
            grid.cols(),
            grid.rows()
        );
        Ok(true)
    }

    pub fn save(&self) -> Vec<u8> {
        render_world_file(self.cells())
    }

    /// Zero bytes read, including a missing file, is nothing to load.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<bool, WorldFileError> {
        let path = path.as_ref();
        let bytes = read_file(path, self.config().max_world_file_bytes);
        if bytes.is_empty() {
            warn!("nothing to load from {}", path.display());
            return Ok(false);
        }
        self.load(&bytes).inspect_err(|err| {
            warn!("rejected world file {}: {}", path.display(), err);
        })
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), WorldFileError> {
        let path = path.as_ref();
        write_file(path, &self.save())?;
        info!("saved {}x{} world to {}", self.cols(), self.rows(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WorldPos;

    fn small_config() -> WorldConfig {
        WorldConfig::default().with_block_size(GridSize::new(4, 4))
    }

    #[test]
    fn parse_reads_rows_and_columns() {
        let cells = parse_world_file(b"010\n001\n111\n").unwrap().unwrap();
        assert_eq!(cells.size(), GridSize::new(3, 3));
        assert_eq!(cells.population(), 5);
        assert!(cells[Loc::new(0, 1)].alive);
        assert!(!cells[Loc::new(1, 1)].alive);
    }

    #[test]
    fn last_newline_is_optional() {
        let terminated = parse_world_file(b"10\n01\n").unwrap().unwrap();
        let unterminated = parse_world_file(b"10\n01").unwrap().unwrap();
        assert_eq!(terminated, unterminated);
        assert_eq!(unterminated.size(), GridSize::new(2, 2));
    }

    #[test]
    fn unequal_rows_are_rejected() {
        assert_eq!(
            parse_world_file(b"000\n00\n000\n"),
            Err(ParseError::UnequalRowLength {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_world_file(b"000\n0000"),
            Err(ParseError::UnequalRowLength {
                row: 1,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn invalid_characters_are_rejected() {
        assert_eq!(
            parse_world_file(b"010\n0x0\n"),
            Err(ParseError::InvalidCharacter {
                row: 1,
                col: 1,
                byte: b'x'
            })
        );
        assert!(matches!(
            parse_world_file(b"01\r\n10\r\n"),
            Err(ParseError::InvalidCharacter { byte: b'\r', .. })
        ));
    }

    #[test]
    fn empty_input_has_nothing_to_load() {
        assert_eq!(parse_world_file(b""), Ok(None));
        assert_eq!(parse_world_file(b"\n\n"), Ok(None));
    }

    #[test]
    fn load_grows_in_whole_blocks_without_moving_origin() {
        let mut world = LifeWorld::new(small_config()).unwrap();
        let bytes = b"100000\n000000\n000000\n000000\n000001\n";
        assert!(world.load(bytes).unwrap());
        assert_eq!(world.size(), GridSize::new(8, 8));
        assert_eq!(world.origin(), WorldPos::new(0, 0));
        assert!(world.is_alive(Loc::new(0, 0)));
        assert!(world.is_alive(Loc::new(4, 5)));
        assert_eq!(world.population(), 2);
    }

    #[test]
    fn load_replaces_previous_cells() {
        let mut world = LifeWorld::new(small_config()).unwrap();
        world.toggle_cell(WorldPos::new(3, 3)).unwrap();
        world.load(b"01\n10\n").unwrap();
        assert!(!world.is_alive(Loc::new(3, 3)));
        assert_eq!(world.population(), 2);
    }

    #[test]
    fn failed_load_leaves_world_untouched() {
        let mut world = LifeWorld::new(small_config()).unwrap();
        world.toggle_cell(WorldPos::new(1, 1)).unwrap();
        let before = world.cells().clone();
        let result = world.load(b"0000000\n02\n");
        assert!(matches!(result, Err(WorldFileError::Parse(_))));
        assert_eq!(world.cells(), &before);
        assert_eq!(world.size(), GridSize::new(4, 4));
    }

    #[test]
    fn save_renders_whole_grid() {
        let mut world = LifeWorld::new(WorldConfig::default().with_block_size(GridSize::new(3, 2)))
            .unwrap();
        world.toggle_cell(WorldPos::new(2, 0)).unwrap();
        world.toggle_cell(WorldPos::new(0, 1)).unwrap();
        assert_eq!(world.save(), b"001\n100\n".to_vec());
    }

    #[test]
    fn missing_file_is_nothing_to_load() {
        let mut world = LifeWorld::new(small_config()).unwrap();
        let loaded = world
            .load_from_file("/definitely/not/a/world/file.txt")
            .unwrap();
        assert!(!loaded);
        assert_eq!(world.population(), 0);
    }
}
