//! Conway's B3/S23 rule.

/// Whether a cell is alive in the next generation.
pub fn next_state(alive: bool, live_neighbors: u32) -> bool {
    if alive {
        (2..=3).contains(&live_neighbors)
    } else {
        live_neighbors == 3
    }
}
