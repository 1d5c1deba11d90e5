//! Random tile placement.

use rand::Rng;

use crate::error::{GameError, Result};
use crate::grid::Grid;

/// Values a spawned tile may take, each with equal probability.
pub const SPAWN_VALUES: [u32; 2] = [2, 4];

/// A tile placed by [`place_random_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub index: usize,
    pub value: u32,
}

/// Spawn a new tile in a uniformly chosen empty cell.
/// The value is 2 or 4 with probability 1/2 each.
pub fn place_random_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<Spawned> {
    let empty_cells: Vec<usize> = grid.empty_cells().collect();
    if empty_cells.is_empty() {
        return Err(GameError::NoSpaceAvailable);
    }

    let index = empty_cells[rng.gen_range(0..empty_cells.len())];
    let value = SPAWN_VALUES[rng.gen_range(0..SPAWN_VALUES.len())];
    grid.set(index, value)?;
    Ok(Spawned { index, value })
}
