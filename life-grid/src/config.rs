use crate::grid::GridSize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Rows and columns added per growth step; also the initial extent.
    pub block_size: GridSize,
    pub ticks_per_sec: f64,
    /// World files are truncated to this many bytes when read.
    pub max_world_file_bytes: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            block_size: Self::DEFAULT_BLOCK_SIZE,
            ticks_per_sec: Self::DEFAULT_TICKS_PER_SEC,
            max_world_file_bytes: Self::MAX_WORLD_FILE_BYTES,
        }
    }
}

impl WorldConfig {
    pub const DEFAULT_BLOCK_SIZE: GridSize = GridSize::new(20, 20);
    pub const DEFAULT_TICKS_PER_SEC: f64 = 2.0;
    pub const MIN_TICKS_PER_SEC: f64 = 0.6;
    pub const MAX_TICKS_PER_SEC: f64 = 20.0;
    pub const TICK_RATE_STEP: f64 = 1.25;
    pub const MAX_WORLD_FILE_BYTES: usize = 8192;

    pub fn with_block_size(mut self, block_size: GridSize) -> Self {
        assert!(block_size.width > 0 && block_size.height > 0);
        self.block_size = block_size;
        self
    }

    pub fn with_ticks_per_sec(mut self, ticks_per_sec: f64) -> Self {
        self.ticks_per_sec = ticks_per_sec;
        self
    }
}
