//! Level parameter curve
//!
//! Pure function from a level index to difficulty parameters. No randomness:
//! the same level always yields the same parameters.

use serde::{Deserialize, Serialize};

use super::color::{BubbleColor, PALETTE, active_palette};

/// Difficulty curve knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    /// Rows at level 1
    pub base_rows: u32,
    /// +1 row every N levels
    pub rows_every_levels: u32,
    pub max_rows: u32,

    /// Active colors at level 1
    pub base_colors: u32,
    /// +1 color every N levels
    pub colors_every_levels: u32,
    pub max_colors: u32,

    /// Shots at level 1
    pub base_shots: u32,
    pub min_shots: u32,
    /// -2 shots every N levels
    pub shots_decrease_every_levels: u32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base_rows: 6,
            rows_every_levels: 5,
            max_rows: 12,

            base_colors: 3,
            colors_every_levels: 8,
            max_colors: 6,

            base_shots: 25,
            min_shots: 15,
            shots_decrease_every_levels: 8,
        }
    }
}

/// Immutable per-level parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u32,
    pub rows: u32,
    pub cols: u32,
    pub color_count: u32,
    pub palette: Vec<BubbleColor>,
    pub shots: u32,
    pub target_score: u32,
}

impl DifficultyCurve {
    /// Parameters for `level` (levels below 1 are treated as 1).
    ///
    /// Saturates instead of overflowing for any level or column count; the
    /// color count never exceeds the palette.
    pub fn params(&self, level: u32, cols: u32) -> LevelParams {
        let level = level.max(1);
        let step = |every: u32| (level - 1) / every.max(1);

        let rows = self
            .base_rows
            .saturating_add(step(self.rows_every_levels))
            .clamp(self.base_rows, self.max_rows.max(self.base_rows));

        let color_count = self
            .base_colors
            .saturating_add(step(self.colors_every_levels))
            .clamp(self.base_colors, self.max_colors.max(self.base_colors))
            .min(PALETTE.len() as u32);

        let shots = self
            .base_shots
            .saturating_sub(step(self.shots_decrease_every_levels).saturating_mul(2))
            .max(self.min_shots);

        let target_score = rows.saturating_mul(cols).saturating_mul(5).saturating_add(1000);

        LevelParams {
            level,
            rows,
            cols,
            color_count,
            palette: active_palette(color_count as usize),
            shots,
            target_score,
        }
    }
}
