//! # 1024 Game Core Engine
//!
//! The board transition engine for a sliding-tile merge puzzle on a square
//! board of 4 to 12 cells per side. Tiles slide in one of four directions,
//! equal neighbours merge into their sum, and a random 2 or 4 spawns after
//! every move that changed the board. Every effective move is recorded so
//! it can be undone.
//!
//! The spawner uses a seedable PRNG, so a seed reproduces a game exactly.
//!
//! ## Example
//!
//! ```rust
//! use game_1024_core::{Direction, Game, GameState};
//!
//! let mut game = Game::new(4, 42).unwrap();
//! let outcome = game.apply_move(Direction::Left);
//! println!("Score: {}, Changed: {}", game.score(), outcome.changed);
//! assert_eq!(game.target(), 1024);
//! assert_eq!(outcome.state, GameState::Playing);
//! ```

use std::fmt;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod error;
pub mod grid;
pub mod history;
pub mod slide;
pub mod spawn;

pub use error::{GameError, Result};
pub use grid::{Grid, MAX_SIDE, MIN_SIDE};
pub use history::{History, Snapshot};
pub use slide::{Direction, SlideResult};

/// Target tile on the base 4x4 board; doubles with every extra side cell.
pub const BASE_TARGET: u32 = 1024;
const BASE_SIDE: usize = 4;

/// Number of tiles placed when a game is first created.
const INITIAL_TILES: usize = 2;

/// Tile value that wins a game on a board of `side` cells per side.
pub fn target_for_side(side: usize) -> u32 {
    BASE_TARGET << side.saturating_sub(BASE_SIDE)
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Playing,
    /// A tile has reached the target. Play may continue.
    Won,
    /// The board is full and no direction changes it.
    Blocked,
    /// The player quit; nothing but reading state is possible.
    Exited,
}

/// Result of applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the board changed (and a new tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub score_delta: u64,
    /// State after the move.
    pub state: GameState,
}

/// The game state controller.
///
/// Owns the board, score, move counter and history, and is the only thing
/// that mutates them.
#[derive(Clone)]
pub struct Game {
    grid: Grid,
    score: u64,
    move_counter: u32,
    target: u32,
    state: GameState,
    history: History,
    rng: SmallRng,
}

impl Game {
    /// Create a new game on a `side` x `side` board with the given seed.
    ///
    /// The game starts with two random tiles (each 2 or 4).
    pub fn new(side: usize, seed: u64) -> Result<Self> {
        let mut grid = Grid::new(side)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..INITIAL_TILES {
            spawn::place_random_tile(&mut grid, &mut rng)?;
        }

        let history = History::new(Snapshot::new(&grid, 0, 1));
        let mut game = Game {
            grid,
            score: 0,
            move_counter: 1,
            target: target_for_side(side),
            state: GameState::Playing,
            history,
            rng,
        };
        game.update_state();
        info!("new {}x{} game, target {}", side, side, game.target);
        Ok(game)
    }

    /// Slide the board towards `direction`.
    ///
    /// If the board changed, a tile is spawned, the move counter advances
    /// and the new state is recorded in the history. A move that changes
    /// nothing leaves everything untouched, including the RNG.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.state == GameState::Exited {
            return MoveOutcome {
                changed: false,
                score_delta: 0,
                state: self.state,
            };
        }

        let result = slide::slide(&mut self.grid, direction);
        let changed = result.changed;

        if changed {
            // A changed board always has at least one empty cell: either
            // tiles moved away from the far edge or a merge emptied one.
            if let Err(e) = spawn::place_random_tile(&mut self.grid, &mut self.rng) {
                warn!("{:?} changed the board but left no room: {}", direction, e);
            }
            self.score += result.score_delta;
            self.move_counter += 1;
            self.history.push(&self.grid, self.score, self.move_counter);
            self.update_state();
        }

        debug!(
            "move {} {:?}: changed={} delta={} score={} state={:?}",
            self.move_counter, direction, changed, result.score_delta, self.score, self.state
        );

        MoveOutcome {
            changed,
            score_delta: result.score_delta,
            state: self.state,
        }
    }

    /// Restore the state before the most recent effective move.
    pub fn undo(&mut self) -> Result<()> {
        self.ensure_active()?;
        let snapshot = match self.history.undo() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("undo rejected: {}", e);
                return Err(e);
            }
        };
        self.grid.copy_from(snapshot.grid());
        self.score = snapshot.score();
        self.move_counter = snapshot.move_counter();
        self.update_state();
        debug!("undo to move {}", self.move_counter);
        Ok(())
    }

    /// Start over on an empty `side` x `side` board with one random tile.
    ///
    /// Score goes back to 0, the move counter to 1, the history is replaced
    /// by a single entry and the target is rescaled for the new size.
    pub fn reset(&mut self, side: usize) -> Result<()> {
        self.ensure_active()?;
        let mut grid = Grid::new(side)?;
        spawn::place_random_tile(&mut grid, &mut self.rng)?;

        self.grid = grid;
        self.score = 0;
        self.move_counter = 1;
        self.target = target_for_side(side);
        self.history = History::new(Snapshot::new(&self.grid, 0, 1));
        self.update_state();
        info!("reset to {}x{}, target {}", side, side, self.target);
        Ok(())
    }

    /// Place `value` at `index` directly, bypassing the rules.
    ///
    /// Only the board changes; score, move counter and history stay as
    /// they are. The state is re-evaluated.
    pub fn debug_set_cell(&mut self, index: usize, value: u32) -> Result<()> {
        self.ensure_active()?;
        if !grid::is_valid_tile(value) {
            return Err(GameError::InvalidTileValue(value));
        }
        self.grid.set(index, value)?;
        self.update_state();
        debug!("debug placed {} at {}", value, index);
        Ok(())
    }

    /// Leave the game. Every later mutation is rejected.
    pub fn exit(&mut self) {
        self.state = GameState::Exited;
    }

    /// Get the legal moves as a boolean array [Left, Up, Right, Down].
    ///
    /// A move is legal if it would change the board.
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::all().map(|d| slide::can_slide(&self.grid, d))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Tile value that wins on the current board size.
    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    fn ensure_active(&self) -> Result<()> {
        if self.state == GameState::Exited {
            Err(GameError::Exited)
        } else {
            Ok(())
        }
    }

    /// Recompute the state from the board: Won, then Blocked, then Playing.
    fn update_state(&mut self) {
        let next = if self.grid.max_tile() >= self.target {
            GameState::Won
        } else if slide::is_blocked(&self.grid) {
            GameState::Blocked
        } else {
            GameState::Playing
        };

        if next != self.state {
            match next {
                GameState::Won => info!("reached {} at move {}", self.target, self.move_counter),
                GameState::Blocked => info!("no moves left, final score {}", self.score),
                _ => {}
            }
        }
        self.state = next;
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Game {{ score: {}, move: {}, state: {:?} }}",
            self.score, self.move_counter, self.state
        )?;
        write!(f, "{:?}", self.grid)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "        Score: {}", self.score)?;
        write!(f, "{}", self.grid)
    }
}

// =============================================================================
// Tests
// =============================================================================
