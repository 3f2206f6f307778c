//! Row reveal controller
//!
//! A level is generated with more rows than it shows at once. When the top row
//! empties, the board shifts down one row and a fresh, partially filled row 0
//! is spawned, until the level's row count has been revealed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::grid::{Bubble, OccupancyGrid};
use super::hex::CellCoord;
use crate::error::EngineError;

/// What a reveal check did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Row 0 still occupied, or every row already revealed
    Idle,
    /// Board shifted down and these bubbles were spawned in row 0
    Revealed { spawned: Vec<Bubble> },
}

/// Per-level reveal progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReveal {
    /// Rows revealed so far
    pub revealed: u32,
    /// Rows the level was generated with
    pub total_rows: u32,
}

impl RowReveal {
    pub fn new(total_rows: u32) -> Self {
        Self {
            revealed: 0,
            total_rows,
        }
    }

    /// True when row 0 is empty and rows remain to reveal
    pub fn should_reveal(&self, grid: &OccupancyGrid) -> bool {
        self.revealed < self.total_rows && grid.row_is_empty(0)
    }

    /// Shift and spawn if due.
    ///
    /// An overflowing shift is aborted with the grid untouched and the counter
    /// unchanged; the next empty-top-row detection retries.
    pub fn try_reveal<R: Rng + ?Sized>(
        &mut self,
        grid: &mut OccupancyGrid,
        palette: &[BubbleColor],
        fill_chance: f64,
        ceiling: u32,
        rng: &mut R,
    ) -> Result<RevealOutcome, EngineError> {
        if !self.should_reveal(grid) {
            return Ok(RevealOutcome::Idle);
        }

        grid.shift_down(ceiling)?;

        let mut spawned = Vec::new();
        if !palette.is_empty() {
            for col in 0..grid.cols() {
                if rng.random::<f64>() < fill_chance {
                    let color = palette[rng.random_range(0..palette.len())];
                    let bubble = Bubble::new(CellCoord::new(0, col), color);
                    grid.insert(bubble)?;
                    spawned.push(bubble);
                }
            }
        }

        self.revealed += 1;
        log::debug!(
            "Revealed row {}/{} ({} bubbles spawned)",
            self.revealed,
            self.total_rows,
            spawned.len()
        );
        Ok(RevealOutcome::Revealed { spawned })
    }
}
