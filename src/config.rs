//! Engine configuration
//!
//! Geometry, launcher, difficulty curve and match rules. Every section has
//! serde defaults, so a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{DifficultyCurve, Geometry, Launcher, PALETTE};

/// Match, scoring and grid-arena rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Smallest same-color group that pops
    pub min_match_count: usize,
    pub points_per_matched: u32,
    pub points_per_dropped: u32,
    /// Rows scanned below `max_rows` when snapping
    pub search_slack_rows: u32,
    /// Subtracted from the diameter for bubble contact
    pub collision_tolerance: f32,
    /// Chance a column is filled in a revealed row
    pub reveal_fill_chance: f64,
    /// A row shift may not move bubbles below `max_rows - overflow_margin_rows`
    pub overflow_margin_rows: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            min_match_count: MIN_MATCH_COUNT,
            points_per_matched: POINTS_PER_MATCHED,
            points_per_dropped: POINTS_PER_DROPPED,
            search_slack_rows: SEARCH_SLACK_ROWS,
            collision_tolerance: COLLISION_TOLERANCE,
            reveal_fill_chance: REVEAL_FILL_CHANCE,
            overflow_margin_rows: OVERFLOW_MARGIN_ROWS,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geometry: Geometry,
    pub launcher: Launcher,
    pub difficulty: DifficultyCurve,
    pub rules: MatchRules,
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        if !(g.radius > 0.0) {
            return Err(ConfigError::Invalid("bubble radius must be positive".into()));
        }
        if g.right - g.left < g.radius * 2.0 {
            return Err(ConfigError::Invalid("playfield narrower than one bubble".into()));
        }
        if g.bottom <= g.top {
            return Err(ConfigError::Invalid("playfield bottom must be below top".into()));
        }

        let l = &self.launcher;
        if !(l.speed > 0.0) {
            return Err(ConfigError::Invalid("launch speed must be positive".into()));
        }
        if !(0.0..=180.0).contains(&l.min_angle_deg) || l.min_angle_deg > l.max_angle_deg || l.max_angle_deg > 180.0 {
            return Err(ConfigError::Invalid(format!(
                "aim limits {}..{} out of range",
                l.min_angle_deg, l.max_angle_deg
            )));
        }

        let d = &self.difficulty;
        if d.base_rows == 0 || d.base_colors == 0 {
            return Err(ConfigError::Invalid("levels need at least one row and one color".into()));
        }
        if d.base_rows > d.max_rows {
            return Err(ConfigError::Invalid(format!(
                "base_rows {} exceeds max_rows {}",
                d.base_rows, d.max_rows
            )));
        }
        if d.base_colors > d.max_colors {
            return Err(ConfigError::Invalid(format!(
                "base_colors {} exceeds max_colors {}",
                d.base_colors, d.max_colors
            )));
        }
        if d.max_colors as usize > PALETTE.len() {
            return Err(ConfigError::Invalid(format!(
                "max_colors {} exceeds the {}-color palette",
                d.max_colors,
                PALETTE.len()
            )));
        }
        if d.max_rows <= self.rules.overflow_margin_rows {
            return Err(ConfigError::Invalid(format!(
                "max_rows {} leaves no room above the overflow margin",
                d.max_rows
            )));
        }

        let r = &self.rules;
        if r.min_match_count < 2 {
            return Err(ConfigError::Invalid("min_match_count must be at least 2".into()));
        }
        if !(0.0..=1.0).contains(&r.reveal_fill_chance) {
            return Err(ConfigError::Invalid("reveal_fill_chance must be in [0, 1]".into()));
        }
        Ok(())
    }

    /// Row capacity of the grid arena (the snap search window)
    pub fn arena_rows(&self) -> u32 {
        self.difficulty.max_rows.saturating_add(self.rules.search_slack_rows)
    }

    /// Lowest row a row shift may move a bubble to
    pub fn shift_ceiling(&self) -> u32 {
        self.difficulty.max_rows.saturating_sub(self.rules.overflow_margin_rows)
    }
}
