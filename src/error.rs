//! Structured failures returned across the engine boundary
//!
//! Nothing here is fatal: the tick driver logs faults and keeps running, and
//! fire rejections are plain signals for the presentation layer.

use thiserror::Error;

use crate::sim::CellCoord;

/// Why a `fire` call was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FireRejection {
    #[error("a projectile is already in flight")]
    ProjectileActive,
    #[error("no shots remaining")]
    OutOfShots,
    #[error("level is not in play")]
    NotPlaying,
}

/// Engine faults and rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Snap search exhausted its window; the projectile is discarded
    #[error("no empty cell within the {rows}-row search window")]
    NoEmptyCellFound { rows: u32 },

    /// Commit target was already occupied
    #[error("cell {0} is already occupied")]
    DuplicatePlacementAttempt(CellCoord),

    /// Cell lies outside the bounded grid arena
    #[error("cell {0} is outside the grid arena")]
    CellOutOfArena(CellCoord),

    /// Row reveal would push a bubble past the row ceiling; nothing moved
    #[error("row shift would move a bubble to row {row}, past ceiling {ceiling}")]
    RowShiftOverflow { row: u32, ceiling: u32 },

    #[error("fire rejected: {0}")]
    InvalidFireWhileActive(FireRejection),

    /// Engine built from a config that fails validation
    #[error("{0}")]
    InvalidConfig(String),
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
