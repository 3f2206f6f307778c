//! Deterministic grid and match simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (level content is a pure function of the level index)
//! - Stable row-major iteration over the grid
//! - No rendering or platform dependencies

pub mod aim;
pub mod color;
pub mod grid;
pub mod hex;
pub mod level;
pub mod loadout;
pub mod pattern;
pub mod projectile;
pub mod resolve;
pub mod reveal;
pub mod state;
pub mod tick;

pub use aim::{AimGuide, AimPreview};
pub use color::{BubbleColor, PALETTE, active_palette};
pub use grid::{Bubble, OccupancyGrid};
pub use hex::{CellCoord, Geometry};
pub use level::{DifficultyCurve, LevelParams};
pub use loadout::Loadout;
pub use pattern::PatternKind;
pub use projectile::{Launcher, Projectile, Termination};
pub use resolve::{SnapResult, resolve_snap};
pub use reveal::{RevealOutcome, RowReveal};
pub use state::{GameState, GridEvent, LevelInit, LevelPhase};
pub use tick::{TickOutcome, fire, fire_loaded, tick};
