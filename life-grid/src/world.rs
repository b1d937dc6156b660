use crate::config::WorldConfig;
use crate::error::GridError;
use crate::grid::{CellBuffer, GridSize, Growth, LifeCell, LifeGrid, Loc, Neighborhood, WorldPos};
use crate::random::Random;
use crate::rule::next_state;
use log::{debug, error, trace, warn};

/// What a single [`LifeWorld::step`] did to the grid's extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub grew: Growth,
}

/// A Game of Life world on a grid that grows wherever live cells reach
/// its edge.
#[derive(Debug)]
pub struct LifeWorld {
    grid: LifeGrid,
    config: WorldConfig,
    paused: bool,
    edit_mode: bool,
    generation: u64,
}

impl LifeWorld {
    pub fn new(config: WorldConfig) -> Result<Self, GridError> {
        debug!(
            "creating {}x{} world",
            config.block_size.width, config.block_size.height
        );
        Ok(Self {
            grid: LifeGrid::new(config.block_size)?,
            config,
            paused: false,
            edit_mode: false,
            generation: 0,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut LifeGrid {
        &mut self.grid
    }

    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn origin(&self) -> WorldPos {
        self.grid.origin()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.cells().population()
    }

    pub fn cells(&self) -> &CellBuffer {
        self.grid.cells()
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &LifeCell> + Clone {
        self.grid.cells_iter()
    }

    /// Local-coordinate query for renderers; anything off the grid is dead.
    pub fn is_alive(&self, loc: Loc) -> bool {
        self.grid.cell(loc).is_ok_and(|cell| cell.alive)
    }

    pub fn cell_at(&self, pos: WorldPos) -> Result<&LifeCell, GridError> {
        let loc = self.grid.to_local(pos)?;
        self.grid.cell(loc)
    }

    /// Flips the cell at a world position and returns its new state.
    pub fn toggle_cell(&mut self, pos: WorldPos) -> Result<bool, GridError> {
        let loc = self.grid.to_local(pos).inspect_err(|err| {
            warn!("ignoring toggle: {}", err);
        })?;
        self.grid.toggle(loc)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    /// Automatic stepping only happens when neither paused nor editing.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.edit_mode
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    pub fn add_random_life(&mut self, rand: &mut Random, fill_rate: f64) {
        for cell in self.grid.cells_mut().cells_iter_mut() {
            if rand.next_bool(fill_rate) {
                cell.alive = true;
            }
        }
    }

    /// Advances one generation. A no-op while paused.
    ///
    /// Each side of the grid where a cell is alive in the new generation
    /// grows by exactly one block, before the new generation is copied in.
    /// Activity that would reach further than one block in a single
    /// generation is clipped.
    pub fn step(&mut self) -> Result<StepOutcome, GridError> {
        if self.paused {
            return Ok(StepOutcome::default());
        }
        if self.grid.next_size() != self.grid.size() {
            self.grid.grow_next_to_match()?;
        }

        let growth = self.compute_next_generation();
        let offset = self.grow_for_next(growth)?;
        self.grid.commit_next(offset);
        self.generation += 1;
        trace!("generation {}", self.generation);

        self.grid.grow_next_to_match()?;
        Ok(StepOutcome { grew: growth })
    }

    /// Returns where the pending generation lands in the grown grid. On
    /// failure the pending generation is discarded.
    fn grow_for_next(&mut self, growth: Growth) -> Result<Loc, GridError> {
        let previous_origin = self.grid.origin();
        if let Err(err) = self.grid.grow_by(growth) {
            error!("step {} could not grow the grid: {}", self.generation, err);
            self.grid.clear_next();
            return Err(err);
        }
        let origin = self.grid.origin();
        Ok(Loc::new(
            (previous_origin.y - origin.y) as u32,
            (previous_origin.x - origin.x) as u32,
        ))
    }

    fn compute_next_generation(&mut self) -> Growth {
        let size = self.grid.size();
        let (cells, next_cells) = self.grid.buffers_mut();
        let mut growth = Growth::NONE;
        for row in 0..size.height {
            for col in 0..size.width {
                let loc = Loc::new(row, col);
                let neighbors = Neighborhood::new(cells, loc).num_live_neighbors();
                let alive = next_state(cells[loc].alive, neighbors);
                next_cells[loc].alive = alive;
                if alive {
                    if row == 0 {
                        growth.top = 1;
                    }
                    if row == size.height - 1 {
                        growth.bottom = 1;
                    }
                    if col == 0 {
                        growth.left = 1;
                    }
                    if col == size.width - 1 {
                        growth.right = 1;
                    }
                }
            }
        }
        growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(block: GridSize, alive: &[(u32, u32)]) -> LifeWorld {
        let mut world = LifeWorld::new(WorldConfig::default().with_block_size(block)).unwrap();
        for &(row, col) in alive {
            world.grid.cell_mut(Loc::new(row, col)).unwrap().alive = true;
        }
        world
    }

    fn live_locs(world: &LifeWorld) -> Vec<(u32, u32)> {
        let mut result = vec![];
        for row in 0..world.rows() {
            for col in 0..world.cols() {
                if world.is_alive(Loc::new(row, col)) {
                    result.push((row, col));
                }
            }
        }
        result
    }

    #[test]
    fn block_is_still_life() {
        let block = [(3, 3), (3, 4), (4, 3), (4, 4)];
        let mut world = world_with(GridSize::new(8, 8), &block);
        for _ in 0..10 {
            let outcome = world.step().unwrap();
            assert!(outcome.grew.is_none());
        }
        assert_eq!(live_locs(&world), block.to_vec());
        assert_eq!(world.generation(), 10);
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = vec![(4, 3), (4, 4), (4, 5)];
        let vertical = vec![(3, 4), (4, 4), (5, 4)];
        let mut world = world_with(GridSize::new(9, 9), &horizontal);
        world.step().unwrap();
        assert_eq!(live_locs(&world), vertical);
        world.step().unwrap();
        assert_eq!(live_locs(&world), horizontal);
    }

    #[test]
    fn lone_cell_dies() {
        let mut world = world_with(GridSize::new(5, 5), &[(2, 2)]);
        world.step().unwrap();
        assert_eq!(world.population(), 0);
    }

    #[test]
    fn corner_activity_grows_top_and_left() {
        let mut world = world_with(GridSize::new(6, 4), &[(0, 0), (0, 1), (1, 0), (1, 1)]);
        let before: Vec<WorldPos> = live_locs(&world)
            .into_iter()
            .map(|(row, col)| world.grid.to_world(Loc::new(row, col)))
            .collect();

        let outcome = world.step().unwrap();

        assert_eq!(
            outcome.grew,
            Growth {
                top: 1,
                left: 1,
                ..Growth::NONE
            }
        );
        assert_eq!(world.size(), GridSize::new(12, 8));
        assert_eq!(world.origin(), WorldPos::new(-6, -4));
        for pos in before {
            assert!(world.cell_at(pos).unwrap().alive);
        }
        assert_eq!(world.population(), 4);
        assert_eq!(world.grid.next_size(), world.size());
    }

    #[test]
    fn activity_beyond_edge_is_clipped() {
        // A vertical blinker on the left edge wants world x = -1 next
        // generation; only the in-grid part survives, and the grid grows.
        let mut world = world_with(GridSize::new(5, 5), &[(1, 0), (2, 0), (3, 0)]);
        world.step().unwrap();
        assert_eq!(world.origin(), WorldPos::new(-5, 0));
        assert!(world.cell_at(WorldPos::new(0, 2)).unwrap().alive);
        assert!(world.cell_at(WorldPos::new(1, 2)).unwrap().alive);
        assert!(!world.cell_at(WorldPos::new(-1, 2)).unwrap().alive);
        assert_eq!(world.population(), 2);
    }

    #[test]
    fn blinker_near_edge_survives_growth() {
        let mut world = world_with(GridSize::new(5, 5), &[(1, 1), (2, 1), (3, 1)]);
        world.step().unwrap();
        assert_eq!(world.origin(), WorldPos::new(-5, 0));
        for x in 0..=2 {
            assert!(world.cell_at(WorldPos::new(x, 2)).unwrap().alive);
        }

        let outcome = world.step().unwrap();
        assert!(outcome.grew.is_none());
        for y in 1..=3 {
            assert!(world.cell_at(WorldPos::new(1, y)).unwrap().alive);
        }
        assert_eq!(world.population(), 3);
    }

    #[test]
    fn failed_growth_discards_next_generation() {
        let mut world = world_with(GridSize::new(3, 3), &[(0, 0), (1, 1)]);
        let before = world.cells().clone();
        world.compute_next_generation();
        world.grid.next_cell_mut(Loc::new(2, 2)).unwrap().alive = true;

        let result = world.grow_for_next(Growth {
            left: u32::MAX,
            ..Growth::NONE
        });

        assert!(matches!(result, Err(GridError::SizeOverflow { .. })));
        assert_eq!(world.cells(), &before);
        assert_eq!(world.size(), GridSize::new(3, 3));
        assert_eq!(world.origin(), WorldPos::new(0, 0));
        assert_eq!(world.generation(), 0);
        let (_, next) = world.grid.buffers_mut();
        assert_eq!(next.population(), 0);

        world.step().unwrap();
        assert_eq!(world.generation(), 1);
    }

    #[test]
    fn paused_step_changes_nothing() {
        let mut world = world_with(GridSize::new(6, 6), &[(2, 1), (2, 2), (2, 3)]);
        world.set_paused(true);
        let before = world.cells().clone();
        for _ in 0..5 {
            assert_eq!(world.step().unwrap(), StepOutcome::default());
            assert_eq!(world.cells(), &before);
        }
        assert_eq!(world.generation(), 0);
        assert!(!world.is_running());
    }

    #[test]
    fn edit_mode_suspends_running_but_not_step() {
        let mut world = world_with(GridSize::new(6, 6), &[(2, 1), (2, 2), (2, 3)]);
        assert!(world.toggle_edit_mode());
        assert!(!world.is_running());
        world.step().unwrap();
        assert_eq!(world.generation(), 1);
    }

    #[test]
    fn toggle_cell_uses_world_coordinates() {
        let mut world = world_with(GridSize::new(4, 4), &[(0, 0), (0, 1), (1, 0), (1, 1)]);
        world.step().unwrap();
        assert_eq!(world.origin(), WorldPos::new(-4, -4));

        assert!(world.toggle_cell(WorldPos::new(-4, -4)).unwrap());
        assert!(world.is_alive(Loc::new(0, 0)));
        assert!(!world.toggle_cell(WorldPos::new(-4, -4)).unwrap());
        assert!(world.toggle_cell(WorldPos::new(-5, 0)).is_err());
        assert!(world.toggle_cell(WorldPos::new(4, 0)).is_err());
    }

    #[test]
    fn random_life_is_seeded() {
        let config = WorldConfig::default().with_block_size(GridSize::new(16, 16));
        let mut first = LifeWorld::new(config).unwrap();
        let mut second = LifeWorld::new(config).unwrap();
        first.add_random_life(&mut Random::from_seed(7), 0.3);
        second.add_random_life(&mut Random::from_seed(7), 0.3);
        assert_eq!(first.cells(), second.cells());
        assert!(first.population() > 0);

        first.clear();
        assert_eq!(first.population(), 0);
    }
}
