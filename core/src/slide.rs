//! The slide engine.
//!
//! Every direction runs the same line routine, [`slide_line`], over the
//! rows or columns of the board. A [`Direction`] only decides which cells
//! form each line and in which order they are read: position 0 of a line
//! is always the edge the tiles move towards.

use crate::grid::Grid;

/// The four possible move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Left = 0,
    Up = 1,
    Right = 2,
    Down = 3,
}

impl Direction {
    /// Convert a u8 to a Direction (0=Left, 1=Up, 2=Right, 3=Down).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Left),
            1 => Some(Direction::Up),
            2 => Some(Direction::Right),
            3 => Some(Direction::Down),
            _ => None,
        }
    }

    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ]
    }

    /// Board index of the `pos`-th cell of line `line`, counting from the
    /// edge tiles slide towards.
    fn cell_index(self, side: usize, line: usize, pos: usize) -> usize {
        let far = side - 1 - pos;
        match self {
            Direction::Left => line * side + pos,
            Direction::Right => line * side + far,
            Direction::Up => pos * side + line,
            Direction::Down => far * side + line,
        }
    }
}

/// What a slide did to the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideResult {
    /// Sum of the tiles produced by merges.
    pub score_delta: u64,
    /// Whether any cell's value differs from before the slide.
    pub changed: bool,
}

/// Slide and merge every line of `grid` towards `direction`, in place.
pub fn slide(grid: &mut Grid, direction: Direction) -> SlideResult {
    let side = grid.side();
    let cells = grid.cells_mut();
    let mut line = vec![0u32; side];
    let mut result = SlideResult::default();

    for l in 0..side {
        for (pos, slot) in line.iter_mut().enumerate() {
            *slot = cells[direction.cell_index(side, l, pos)];
        }
        result.score_delta += slide_line(&mut line);
        for (pos, &value) in line.iter().enumerate() {
            let cell = &mut cells[direction.cell_index(side, l, pos)];
            if *cell != value {
                *cell = value;
                result.changed = true;
            }
        }
    }

    result
}

/// Whether sliding towards `direction` would change the board.
pub fn can_slide(grid: &Grid, direction: Direction) -> bool {
    let mut scratch = grid.clone();
    slide(&mut scratch, direction).changed
}

/// True iff the board is full and no direction would change it.
pub fn is_blocked(grid: &Grid) -> bool {
    grid.is_full() && !Direction::all().into_iter().any(|d| can_slide(grid, d))
}

/// Compact, merge and re-compact one line towards index 0.
/// Returns the points earned from merges.
///
/// A tile produced by a merge is never merged again in the same call, so
/// `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]` and not `[8, 0, 0, 0]`.
/// Two tiles whose sum does not fit in a `u32` do not merge.
pub fn slide_line(line: &mut [u32]) -> u64 {
    compact(line);

    let mut delta = 0;
    for i in 1..line.len() {
        if line[i] == 0 || line[i - 1] != line[i] {
            continue;
        }
        if let Some(merged) = line[i].checked_mul(2) {
            line[i - 1] = merged;
            line[i] = 0;
            delta += u64::from(merged);
        }
    }

    compact(line);
    delta
}

/// Move all non-zero values to the front, preserving their order.
fn compact(line: &mut [u32]) {
    let mut write_idx = 0;
    for read_idx in 0..line.len() {
        if line[read_idx] != 0 {
            if write_idx != read_idx {
                line[write_idx] = line[read_idx];
                line[read_idx] = 0;
            }
            write_idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[u32]) -> Grid {
        Grid::from_cells(cells.to_vec()).unwrap()
    }

    // -------------------------------------------------------------------------
    // Line routine
    // -------------------------------------------------------------------------

    #[test]
    fn test_compact_simple() {
        let mut line = [0, 2, 0, 4];
        compact(&mut line);
        assert_eq!(line, [2, 4, 0, 0]);
    }

    #[test]
    fn test_compact_all_zeros() {
        let mut line = [0; 6];
        compact(&mut line);
        assert_eq!(line, [0; 6]);
    }

    #[test]
    fn test_three_equal_merge_first_pair_only() {
        let mut line = [2, 2, 2, 0];
        let delta = slide_line(&mut line);
        assert_eq!(line, [4, 2, 0, 0]);
        assert_eq!(delta, 4);
    }

    #[test]
    fn test_full_line_single_pair() {
        let mut line = [2, 2, 4, 8];
        let delta = slide_line(&mut line);
        assert_eq!(line, [4, 4, 8, 0]);
        assert_eq!(delta, 4);
    }

    #[test]
    fn test_full_line_no_merge() {
        let mut line = [2, 4, 8, 16];
        let delta = slide_line(&mut line);
        assert_eq!(line, [2, 4, 8, 16]);
        assert_eq!(delta, 0);
    }

    #[test]
    fn test_no_double_merge_chain() {
        let mut line = [2, 2, 2, 2];
        let delta = slide_line(&mut line);
        assert_eq!(line, [4, 4, 0, 0]);
        assert_eq!(delta, 8);
    }

    #[test]
    fn test_merged_tile_does_not_absorb_neighbour() {
        // [4, 2, 2] must not cascade into a single 8
        let mut line = [4, 2, 2, 0];
        let delta = slide_line(&mut line);
        assert_eq!(line, [4, 4, 0, 0]);
        assert_eq!(delta, 4);
    }

    #[test]
    fn test_merge_across_gaps() {
        let mut line = [2, 0, 0, 0, 0, 2];
        let delta = slide_line(&mut line);
        assert_eq!(line, [4, 0, 0, 0, 0, 0]);
        assert_eq!(delta, 4);
    }

    #[test]
    fn test_long_line_pairs() {
        let mut line = [8, 8, 0, 4, 4, 4, 2, 0, 2, 0, 16, 16];
        let delta = slide_line(&mut line);
        assert_eq!(line, [16, 8, 4, 4, 32, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(delta, 16 + 8 + 4 + 32);
    }

    #[test]
    fn test_largest_tiles_merge_only_while_sum_fits() {
        let mut line = [1 << 30, 1 << 30, 1 << 31, 1 << 31];
        let delta = slide_line(&mut line);
        assert_eq!(line, [1 << 31, 1 << 31, 1 << 31, 0]);
        assert_eq!(delta, 1 << 31);

        let mut line = [1 << 31, 1 << 31, 0, 0];
        assert_eq!(slide_line(&mut line), 0);
        assert_eq!(line, [1 << 31, 1 << 31, 0, 0]);
    }

    // -------------------------------------------------------------------------
    // Board directions
    // -------------------------------------------------------------------------

    const MIXED_ROWS: [u32; 16] = [2, 2, 0, 0, 0, 4, 4, 0, 2, 0, 2, 0, 8, 8, 8, 8];
    const MIXED_COLS: [u32; 16] = [2, 0, 2, 8, 2, 4, 0, 8, 0, 4, 2, 8, 0, 0, 0, 8];

    #[test]
    fn test_slide_left() {
        let mut g = grid(&MIXED_ROWS);
        let result = slide(&mut g, Direction::Left);
        assert_eq!(
            g.cells(),
            &[4, 0, 0, 0, 8, 0, 0, 0, 4, 0, 0, 0, 16, 16, 0, 0]
        );
        assert_eq!(result.score_delta, 4 + 8 + 4 + 32);
        assert!(result.changed);
    }

    #[test]
    fn test_slide_right() {
        let mut g = grid(&MIXED_ROWS);
        let result = slide(&mut g, Direction::Right);
        assert_eq!(
            g.cells(),
            &[0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 4, 0, 0, 16, 16]
        );
        assert_eq!(result.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_slide_right_merges_edgeward_pair_first() {
        let mut g = grid(&[2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        slide(&mut g, Direction::Right);
        assert_eq!(&g.cells()[..4], &[0, 0, 2, 4]);
    }

    #[test]
    fn test_slide_up() {
        let mut g = grid(&MIXED_COLS);
        let result = slide(&mut g, Direction::Up);
        assert_eq!(
            g.cells(),
            &[4, 8, 4, 16, 0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(result.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_slide_down() {
        let mut g = grid(&MIXED_COLS);
        let result = slide(&mut g, Direction::Down);
        assert_eq!(
            g.cells(),
            &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 16, 4, 8, 4, 16]
        );
        assert_eq!(result.score_delta, 4 + 8 + 4 + 32);
    }

    #[test]
    fn test_slide_larger_board() {
        let mut cells = vec![0; 25];
        cells[4] = 2; // row 0, last column
        cells[24] = 2; // row 4, last column
        let mut g = Grid::from_cells(cells).unwrap();
        let result = slide(&mut g, Direction::Up);
        assert_eq!(g.get(4), Ok(4));
        assert_eq!(g.count_empty(), 24);
        assert_eq!(result.score_delta, 4);
    }

    #[test]
    fn test_empty_board_unchanged() {
        let mut g = Grid::new(4).unwrap();
        for d in Direction::all() {
            assert_eq!(slide(&mut g, d), SlideResult::default());
        }
    }

    #[test]
    fn test_compacted_board_unchanged() {
        let mut g = grid(&[2, 0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 16, 0, 0, 0]);
        let before = g.clone();
        let result = slide(&mut g, Direction::Left);
        assert!(!result.changed);
        assert_eq!(g, before);
    }

    // -------------------------------------------------------------------------
    // Move detection
    // -------------------------------------------------------------------------

    #[test]
    fn test_blocked_checkerboard() {
        let g = grid(&[2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(is_blocked(&g));
        for d in Direction::all() {
            assert!(!can_slide(&g, d));
        }
    }

    #[test]
    fn test_full_board_with_vertical_merge_not_blocked() {
        let g = grid(&[2, 4, 8, 16, 2, 8, 16, 32, 4, 16, 32, 64, 8, 32, 64, 128]);
        assert!(g.is_full());
        assert!(!is_blocked(&g));
        assert!(can_slide(&g, Direction::Up));
        assert!(!can_slide(&g, Direction::Left));
    }

    #[test]
    fn test_can_slide_leaves_board_untouched() {
        let g = grid(&MIXED_ROWS);
        let before = g.clone();
        assert!(can_slide(&g, Direction::Left));
        assert_eq!(g, before);
    }

    #[test]
    fn test_direction_from_u8() {
        assert_eq!(Direction::from_u8(0), Some(Direction::Left));
        assert_eq!(Direction::from_u8(1), Some(Direction::Up));
        assert_eq!(Direction::from_u8(2), Some(Direction::Right));
        assert_eq!(Direction::from_u8(3), Some(Direction::Down));
        assert_eq!(Direction::from_u8(4), None);
    }
}
