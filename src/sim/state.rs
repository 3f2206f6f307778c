//! Game state and level lifecycle
//!
//! Everything the tick driver mutates lives here. The shot budget and score
//! are owned by the caller and only read or reported.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aim::{self, AimGuide, AimPreview};
use super::grid::{Bubble, OccupancyGrid};
use super::hex::CellCoord;
use super::level::LevelParams;
use super::loadout::Loadout;
use super::pattern;
use super::projectile::Projectile;
use super::reveal::RowReveal;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::session::ShotBudget;

/// Level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Board being built; never observed between calls
    Generating,
    /// Accepting shots
    Playing,
    /// Board emptied
    Cleared,
    /// Out of shots with bubbles left; only a continuation resumes play
    Exhausted,
}

/// Grid mutations, in the order they happened
///
/// The presentation layer keeps its own cell-to-visual table and replays
/// these to stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEvent {
    Placed(Bubble),
    Popped(CellCoord),
    Dropped(CellCoord),
    /// Every bubble moved down one row
    ShiftedDown,
    Spawned(Bubble),
}

/// Result of [`GameState::init_level`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInit {
    pub params: LevelParams,
    pub bubbles: Vec<Bubble>,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: EngineConfig,
    /// Seed the random stream was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: LevelPhase,
    pub params: LevelParams,
    pub(crate) grid: OccupancyGrid,
    /// Bubble in flight, if any
    pub projectile: Option<Projectile>,
    pub reveal: RowReveal,
    pub loadout: Loadout,
    pub aim_guide: AimGuide,
}

impl GameState {
    /// New state at level 1, with columns from the configured playfield.
    ///
    /// The config is validated first; an invalid one is rejected.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|err| EngineError::InvalidConfig(err.to_string()))?;
        let cols = config.geometry.columns();
        let params = config.difficulty.params(1, cols);
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = OccupancyGrid::new(config.arena_rows(), cols);
        let loadout = Loadout::deal(&grid, &params.palette, &mut rng);

        let mut state = Self {
            config,
            seed,
            rng,
            phase: LevelPhase::Generating,
            reveal: RowReveal::new(params.rows),
            params,
            grid,
            projectile: None,
            loadout,
            aim_guide: AimGuide::default(),
        };
        state.init_level(1, cols)?;
        Ok(state)
    }

    /// Replace the board with a freshly generated level.
    ///
    /// The new board is built off to the side and swapped in whole; on error
    /// the previous level is left as it was.
    pub fn init_level(&mut self, level: u32, columns: u32) -> Result<LevelInit, EngineError> {
        let params = self.config.difficulty.params(level, columns);
        let bubbles = pattern::generate(params.level, params.rows, params.cols, &params.palette);

        let mut grid = OccupancyGrid::new(self.config.arena_rows(), params.cols);
        for &bubble in &bubbles {
            grid.insert(bubble)?;
        }

        self.phase = LevelPhase::Generating;
        self.grid = grid;
        self.projectile = None;
        self.reveal = RowReveal::new(params.rows);
        self.loadout = Loadout::deal(&self.grid, &params.palette, &mut self.rng);
        self.params = params.clone();
        self.phase = LevelPhase::Playing;

        log::info!(
            "Level {}: {}x{} grid, {} colors, {} shots, target {}",
            params.level,
            params.rows,
            params.cols,
            params.color_count,
            params.shots,
            params.target_score
        );

        Ok(LevelInit { params, bubbles })
    }

    /// Move on to the next level
    pub fn advance_level(&mut self) -> Result<LevelInit, EngineError> {
        self.init_level(self.params.level.saturating_add(1), self.params.cols)
    }

    /// Read-only view of the board
    pub fn current_occupancy(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn is_level_cleared(&self) -> bool {
        self.phase == LevelPhase::Cleared
    }

    pub fn projectile_active(&self) -> bool {
        self.projectile.is_some()
    }

    /// Re-enter play after a continuation grant.
    ///
    /// Returns true if the phase changed.
    pub fn resume(&mut self, budget: &impl ShotBudget) -> bool {
        if self.phase == LevelPhase::Exhausted && budget.has_shots() {
            log::info!("Level {} resumed with {} shots", self.params.level, budget.shots_remaining());
            self.phase = LevelPhase::Playing;
            return true;
        }
        false
    }

    /// Swap loaded and queued colors (only while nothing is in flight)
    pub fn swap_loadout(&mut self) -> bool {
        if self.projectile.is_some() {
            return false;
        }
        self.loadout.swap();
        true
    }

    /// Trajectory preview for a shot aimed at `target`
    pub fn preview_aim(&self, target: Vec2) -> AimPreview {
        aim::predict(
            &self.config.launcher,
            &self.config.geometry,
            &self.grid,
            target,
            self.config.rules.collision_tolerance,
            self.aim_guide,
        )
    }

    /// Restart the random stream (reveal spawns and color picks)
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }
}
