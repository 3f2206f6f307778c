//! Aim preview
//!
//! Steps along the launch direction with the same wall and termination rules
//! as a live projectile, and reports where the shot would come to rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::OccupancyGrid;
use super::hex::{CellCoord, Geometry};
use super::projectile::{Launcher, find_contact};
use super::resolve::nearest_empty_cell;

/// Preview resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimGuide {
    #[default]
    Standard,
    /// Aim booster: finer steps, longer reach
    Extended,
}

impl AimGuide {
    /// Step length in px
    pub fn step(&self) -> f32 {
        match self {
            AimGuide::Standard => 14.0,
            AimGuide::Extended => 10.0,
        }
    }

    pub fn max_steps(&self) -> usize {
        match self {
            AimGuide::Standard => 90,
            AimGuide::Extended => 120,
        }
    }
}

/// Predicted trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimPreview {
    /// Sampled points after each step, up to and including the stop point
    pub path: Vec<Vec2>,
    /// Where the shot stops, if it stops within the guide's reach
    pub hit: Option<Vec2>,
    /// Cell the shot would snap into
    pub cell: Option<CellCoord>,
}

/// Trace a shot aimed at `target` without touching the grid
pub fn predict(
    launcher: &Launcher,
    geometry: &Geometry,
    grid: &OccupancyGrid,
    target: Vec2,
    tolerance: f32,
    guide: AimGuide,
) -> AimPreview {
    let step = guide.step();
    let left = geometry.left_bound();
    let right = geometry.right_bound();
    let ceiling = geometry.ceiling();

    let mut pos = launcher.position;
    let mut dir = launcher.aim_direction(target);
    let mut path = Vec::with_capacity(guide.max_steps());
    let mut hit = None;

    for _ in 0..guide.max_steps() {
        pos += dir * step;
        if pos.x <= left {
            pos.x = left;
            dir.x = dir.x.abs();
        } else if pos.x >= right {
            pos.x = right;
            dir.x = -dir.x.abs();
        }
        path.push(pos);

        if pos.y <= ceiling || find_contact(grid, geometry, pos, tolerance).is_some() {
            hit = Some(pos);
            break;
        }
    }

    let cell = hit.and_then(|p| nearest_empty_cell(grid, geometry, p));
    AimPreview { path, hit, cell }
}
