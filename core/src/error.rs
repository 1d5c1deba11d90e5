//! Error kinds reported by the game core.
//!
//! Every error is recoverable: the game state is left consistent and the
//! caller decides how to surface the condition (typically a retry prompt).

use thiserror::Error;

use crate::grid::{MAX_SIDE, MIN_SIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell index {index} is out of range for a board of {len} cells")]
    InvalidIndex { index: usize, len: usize },

    #[error("side length {0} is outside {min}..={max}", min = MIN_SIDE, max = MAX_SIDE)]
    InvalidSideLength(usize),

    #[error("tile value {0} is neither empty nor a power of two >= 2")]
    InvalidTileValue(u32),

    #[error("cannot undo past the beginning of the game")]
    CannotUndoPastStart,

    #[error("no empty cell available for a new tile")]
    NoSpaceAvailable,

    #[error("the game has exited")]
    Exited,
}

pub type Result<T> = std::result::Result<T, GameError>;
