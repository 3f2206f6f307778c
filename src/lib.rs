//! Bubble Blast - grid and match simulation engine for a hex bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, projectile, match resolution, levels)
//! - `config`: Data-driven geometry and balance
//! - `session`: Default shot budget and score collaborators
//! - `error`: Structured rejections and invariant faults

pub mod config;
pub mod error;
pub mod session;
pub mod sim;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, FireRejection};
pub use session::{ScoreTally, ShotBudget, ShotCounter};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Design resolution
    pub const DESIGN_WIDTH: f32 = 720.0;
    pub const DESIGN_HEIGHT: f32 = 1280.0;
    /// Width of the centered playfield panel
    pub const PANEL_WIDTH: f32 = 580.0;
    /// Inset of the playfield bounds inside the panel
    pub const PANEL_INSET: f32 = 18.0;
    /// Top of the grid (row 0 sits just below this line)
    pub const PLAYFIELD_TOP: f32 = 140.0;

    /// Bubble defaults
    pub const BUBBLE_RADIUS: f32 = 24.0;
    /// Collision tolerance subtracted from the diameter for bubble contact
    pub const COLLISION_TOLERANCE: f32 = 2.0;

    /// Launcher sits this far above the bottom of the design area
    pub const LAUNCHER_OFFSET_Y: f32 = 130.0;
    pub const LAUNCH_SPEED: f32 = 1100.0;
    /// Aim limits in degrees from horizontal (prevents near-horizontal shots)
    pub const AIM_MIN_DEG: f32 = 10.0;
    pub const AIM_MAX_DEG: f32 = 170.0;

    /// Match rules
    pub const MIN_MATCH_COUNT: usize = 3;
    pub const POINTS_PER_MATCHED: u32 = 10;
    pub const POINTS_PER_DROPPED: u32 = 5;

    /// Extra rows scanned below `max_rows` when snapping
    pub const SEARCH_SLACK_ROWS: u32 = 8;
    /// Rows kept free below a row shift (`max_rows - 2` is the lowest allowed row)
    pub const OVERFLOW_MARGIN_ROWS: u32 = 2;
    /// Chance that a column gets a bubble in a revealed row
    pub const REVEAL_FILL_CHANCE: f64 = 0.7;

    /// Fewest columns a playfield layout may produce
    pub const MIN_COLUMNS: u32 = 7;

    /// Shots granted by a continuation
    pub const CONTINUE_EXTRA_SHOTS: u32 = 5;
}

/// Direction vector for an angle in degrees (screen space, y grows downward)
#[inline]
pub fn direction_from_degrees(angle_deg: f32) -> glam::Vec2 {
    let rad = angle_deg.to_radians();
    glam::Vec2::new(rad.cos(), rad.sin())
}

/// Clamp an aim angle (degrees, `atan2` convention) to `[-max_deg, -min_deg]`
#[inline]
pub fn clamp_aim_degrees(angle_deg: f32, min_deg: f32, max_deg: f32) -> f32 {
    angle_deg.clamp(-max_deg, -min_deg)
}
