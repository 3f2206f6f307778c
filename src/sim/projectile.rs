//! Projectile motion
//!
//! A fired bubble travels in a straight line, reflects elastically off the
//! side walls, and terminates when it reaches the ceiling or touches a bubble
//! already on the grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::grid::OccupancyGrid;
use super::hex::{CellCoord, Geometry};
use crate::consts::*;
use crate::{clamp_aim_degrees, direction_from_degrees};

/// Launcher placement and firing limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Launcher {
    pub position: Vec2,
    /// Projectile speed (px/s)
    pub speed: f32,
    /// Shallowest allowed angle above horizontal (degrees)
    pub min_angle_deg: f32,
    /// Steepest allowed angle, measured the same way (degrees)
    pub max_angle_deg: f32,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            position: Vec2::new(DESIGN_WIDTH / 2.0, DESIGN_HEIGHT - LAUNCHER_OFFSET_Y),
            speed: LAUNCH_SPEED,
            min_angle_deg: AIM_MIN_DEG,
            max_angle_deg: AIM_MAX_DEG,
        }
    }
}

impl Launcher {
    /// Unit direction toward `target`, clamped away from the horizontal
    pub fn aim_direction(&self, target: Vec2) -> Vec2 {
        let delta = target - self.position;
        let angle = delta.y.atan2(delta.x).to_degrees();
        let clamped = clamp_aim_degrees(angle, self.min_angle_deg, self.max_angle_deg);
        direction_from_degrees(clamped)
    }
}

/// Why a projectile stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Reached the top of the playfield
    Ceiling,
    /// Touched the bubble in this cell
    Contact(CellCoord),
}

/// The bubble in flight. Not part of the grid until it snaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BubbleColor,
    /// Area-effect (bomb) shots clear their landing neighborhood
    pub area_effect: bool,
}

impl Projectile {
    pub fn launch(launcher: &Launcher, target: Vec2, color: BubbleColor, area_effect: bool) -> Self {
        Self {
            pos: launcher.position,
            vel: launcher.aim_direction(target) * launcher.speed,
            color,
            area_effect,
        }
    }

    /// Advance one tick. Returns the termination reason, if any.
    pub fn advance(
        &mut self,
        dt: f32,
        geometry: &Geometry,
        grid: &OccupancyGrid,
        tolerance: f32,
    ) -> Option<Termination> {
        self.pos += self.vel * dt;
        reflect_off_walls(&mut self.pos, &mut self.vel, geometry);

        if self.pos.y <= geometry.ceiling() {
            return Some(Termination::Ceiling);
        }
        find_contact(grid, geometry, self.pos, tolerance).map(Termination::Contact)
    }
}

/// Clamp to the side walls and flip horizontal velocity on contact.
///
/// Returns true if a wall was hit.
pub fn reflect_off_walls(pos: &mut Vec2, vel: &mut Vec2, geometry: &Geometry) -> bool {
    let left = geometry.left_bound();
    let right = geometry.right_bound();
    if pos.x <= left {
        pos.x = left;
        vel.x = -vel.x;
        true
    } else if pos.x >= right {
        pos.x = right;
        vel.x = -vel.x;
        true
    } else {
        false
    }
}

/// First occupied cell (row-major) whose center is within `diameter - tolerance`
pub fn find_contact(
    grid: &OccupancyGrid,
    geometry: &Geometry,
    pos: Vec2,
    tolerance: f32,
) -> Option<CellCoord> {
    let reach = geometry.diameter() - tolerance;
    let reach_sq = reach * reach;
    grid.iter()
        .map(|b| b.cell)
        .find(|&cell| geometry.cell_to_position(cell).distance_squared(pos) <= reach_sq)
}
