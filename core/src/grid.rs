//! The square board.
//!
//! Cells are stored in a flat `Vec<u32>` of length `side * side`, in
//! row-major order: cell `(row, col)` lives at index `row * side + col`.
//! Empty cells are 0, tiles contain their value (2, 4, 8, ...).

use std::fmt;

use crate::error::{GameError, Result};

/// Smallest supported side length.
pub const MIN_SIDE: usize = 4;
/// Largest supported side length.
pub const MAX_SIDE: usize = 12;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    side: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Create an all-empty board with `side` cells per side.
    pub fn new(side: usize) -> Result<Self> {
        check_side(side)?;
        Ok(Grid {
            side,
            cells: vec![0; side * side],
        })
    }

    /// Build a board from row-major cell values.
    ///
    /// The side length is inferred from `cells.len()`, which must be the
    /// square of a supported side. Every value must be a valid tile.
    pub fn from_cells(cells: Vec<u32>) -> Result<Self> {
        let side = (MIN_SIDE..=MAX_SIDE)
            .find(|s| s * s == cells.len())
            .ok_or(GameError::InvalidSideLength(cells.len()))?;
        if let Some(&bad) = cells.iter().find(|&&v| !is_valid_tile(v)) {
            return Err(GameError::InvalidTileValue(bad));
        }
        Ok(Grid { side, cells })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells (`side * side`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a board has at least `MIN_SIDE * MIN_SIDE` cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of all cell values.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Result<u32> {
        self.cells.get(index).copied().ok_or(GameError::InvalidIndex {
            index,
            len: self.cells.len(),
        })
    }

    pub fn set(&mut self, index: usize, value: u32) -> Result<()> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::InvalidIndex { index, len })?;
        *cell = value;
        Ok(())
    }

    /// Iterate over `(index, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.cells.iter().copied().enumerate()
    }

    /// Indices of all empty cells, in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().filter(|&(_, v)| v == 0).map(|(i, _)| i)
    }

    /// Overwrite this board with a deep copy of `other`, adopting its size.
    pub fn copy_from(&mut self, other: &Grid) {
        self.side = other.side;
        self.cells.clone_from(&other.cells);
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values. Sliding never changes it.
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells
    }
}

/// Validate a side length against `MIN_SIDE..=MAX_SIDE`.
pub fn check_side(side: usize) -> Result<()> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(GameError::InvalidSideLength(side))
    }
}

/// 0 (empty) or a power of two reachable by doubling from 2.
pub fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{ side: {} }}", self.side)?;
        for row in self.cells.chunks(self.side) {
            for &val in row {
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.side) {
            write!(f, "   ")?;
            for &val in row {
                if val == 0 {
                    write!(f, "{:>6}", '.')?;
                } else {
                    write!(f, "{:>6}", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
