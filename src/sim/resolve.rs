//! Snap and match resolution
//!
//! When a projectile stops it snaps into the nearest empty cell, then either
//! pops a same-color group (flood fill, minimum group size) or, for an
//! area-effect shot, clears the landing cell and its neighbors. Any removal is
//! followed by an orphan sweep that drops everything no longer connected to
//! row 0.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::grid::{Bubble, OccupancyGrid};
use super::hex::{CellCoord, Geometry};
use crate::config::MatchRules;
use crate::error::EngineError;

/// Outcome of one snap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Bubble committed by the snap
    pub placed: Bubble,
    /// Cells cleared by the match (or by the blast for area-effect shots)
    pub matched: Vec<CellCoord>,
    /// Cells dropped by the orphan sweep
    pub dropped: Vec<CellCoord>,
    pub score_delta: u32,
    /// Grid is empty after resolution
    pub board_cleared: bool,
}

impl SnapResult {
    pub fn removed_any(&self) -> bool {
        !self.matched.is_empty() || !self.dropped.is_empty()
    }
}

/// Empty cell nearest to `pos` (squared distance), scanning the whole arena.
///
/// Ties go to the first cell in row-major order.
pub fn nearest_empty_cell(grid: &OccupancyGrid, geometry: &Geometry, pos: Vec2) -> Option<CellCoord> {
    let mut best: Option<(CellCoord, f32)> = None;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = CellCoord::new(row, col);
            if grid.is_occupied(cell) {
                continue;
            }
            let d2 = geometry.cell_to_position(cell).distance_squared(pos);
            if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                best = Some((cell, d2));
            }
        }
    }
    best.map(|(cell, _)| cell)
}

/// Connected same-color group containing `start` (BFS)
pub fn find_match_group(grid: &OccupancyGrid, start: CellCoord) -> Vec<CellCoord> {
    let Some(target) = grid.get(start) else {
        return Vec::new();
    };

    let mut group = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        group.push(cell);
        for neighbor in cell.neighbors(grid.cols()) {
            if grid.get(neighbor) == Some(target) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    group
}

/// Occupied cells reachable from row 0 through occupied neighbors
pub fn find_anchored(grid: &OccupancyGrid) -> HashSet<CellCoord> {
    let mut anchored: HashSet<CellCoord> = grid.row(0).map(|b| b.cell).collect();
    let mut queue: VecDeque<CellCoord> = anchored.iter().copied().collect();

    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.neighbors(grid.cols()) {
            if grid.is_occupied(neighbor) && anchored.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    anchored
}

/// Remove every bubble not anchored to row 0. Returns the dropped cells.
pub fn sweep_orphans(grid: &mut OccupancyGrid) -> Vec<CellCoord> {
    let anchored = find_anchored(grid);
    let floating: Vec<CellCoord> = grid
        .iter()
        .map(|b| b.cell)
        .filter(|cell| !anchored.contains(cell))
        .collect();

    for &cell in &floating {
        grid.remove(cell);
    }

    if !floating.is_empty() {
        log::debug!("Dropped {} floating bubbles", floating.len());
    }
    floating
}

/// Snap a stopped projectile into the grid and resolve matches.
///
/// On `NoEmptyCellFound` or a placement fault the grid is left untouched.
pub fn resolve_snap(
    grid: &mut OccupancyGrid,
    geometry: &Geometry,
    rules: &MatchRules,
    end_pos: Vec2,
    color: BubbleColor,
    area_effect: bool,
) -> Result<SnapResult, EngineError> {
    let cell = nearest_empty_cell(grid, geometry, end_pos)
        .ok_or(EngineError::NoEmptyCellFound { rows: grid.rows() })?;
    let placed = Bubble::new(cell, color);
    grid.insert(placed)?;

    let mut score_delta = 0;
    let matched = if area_effect {
        let mut blast = vec![cell];
        blast.extend(cell.neighbors(grid.cols()).filter(|&n| grid.is_occupied(n)));
        blast
    } else {
        let group = find_match_group(grid, cell);
        if group.len() >= rules.min_match_count {
            score_delta += rules.points_per_matched * group.len() as u32;
            group
        } else {
            Vec::new()
        }
    };

    for &c in &matched {
        grid.remove(c);
    }

    let dropped = if matched.is_empty() {
        Vec::new()
    } else {
        sweep_orphans(grid)
    };
    score_delta += rules.points_per_dropped * dropped.len() as u32;

    log::debug!(
        "Snapped {:?} at {} (area={}): matched {}, dropped {}, +{}",
        color,
        cell,
        area_effect,
        matched.len(),
        dropped.len(),
        score_delta
    );

    Ok(SnapResult {
        placed,
        matched,
        dropped,
        score_delta,
        board_cleared: grid.is_empty(),
    })
}
