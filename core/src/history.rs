//! Move history for undo.
//!
//! A stack of immutable snapshots, newest on top. The bottom entry is the
//! state right after setup and is never popped.

use std::fmt;

use crate::error::{GameError, Result};
use crate::grid::Grid;

/// A full copy of the game state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: Grid,
    score: u64,
    move_counter: u32,
}

impl Snapshot {
    pub fn new(grid: &Grid, score: u64, move_counter: u32) -> Self {
        Snapshot {
            grid: grid.clone(),
            score,
            move_counter,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }
}

#[derive(Debug, Clone)]
pub struct History {
    // Oldest first; never empty.
    entries: Vec<Snapshot>,
}

impl History {
    /// Start a history whose only (and permanent) entry is `base`.
    pub fn new(base: Snapshot) -> Self {
        History {
            entries: vec![base],
        }
    }

    /// Record a new newest entry.
    pub fn push(&mut self, grid: &Grid, score: u64, move_counter: u32) {
        self.entries.push(Snapshot::new(grid, score, move_counter));
    }

    /// Drop the newest entry and return the one that is now current.
    ///
    /// Fails with [`GameError::CannotUndoPastStart`] when only the base
    /// entry is left; the history is unchanged in that case.
    pub fn undo(&mut self) -> Result<&Snapshot> {
        if self.entries.len() <= 1 {
            return Err(GameError::CannotUndoPastStart);
        }
        self.entries.pop();
        Ok(self.head())
    }

    /// The newest entry.
    pub fn head(&self) -> &Snapshot {
        // Invariant: `entries` always holds the base entry.
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the base entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an undo would succeed.
    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    /// Move counters from newest to oldest. Call again to restart.
    pub fn move_numbers(&self) -> impl Iterator<Item = u32> + Clone + '_ {
        self.entries.iter().rev().map(Snapshot::move_counter)
    }
}

/// Renders as `3->2->1`, newest first.
impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.move_numbers().enumerate() {
            if i > 0 {
                write!(f, "->")?;
            }
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}
