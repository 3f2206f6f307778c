//! Pattern generator: initial color assignment for a fresh level
//!
//! Five deterministic pattern families are selected by `level % 5`. The blob
//! family needs pseudo-random centers; those come from a PCG stream seeded by
//! `(level, index)` so a level always reproduces the same layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::grid::Bubble;
use super::hex::CellCoord;

/// Pattern families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Horizontal stripes, color changes every 2 rows
    Stripes,
    /// Diagonal checker, color by `(row + col) % n`
    Checkers,
    /// Vertical columns, color by `col % n`
    Columns,
    /// Nearest-center Voronoi blobs
    Blobs,
    /// Concentric rings around the grid center
    Rings,
}

impl PatternKind {
    pub fn for_level(level: u32) -> Self {
        match level % 5 {
            0 => PatternKind::Stripes,
            1 => PatternKind::Checkers,
            2 => PatternKind::Columns,
            3 => PatternKind::Blobs,
            _ => PatternKind::Rings,
        }
    }
}

/// Deterministic value in `[0, 1)` for `(level, index)`
pub fn seeded_unit(level: u32, index: u32) -> f32 {
    let seed = (((level as u64) << 32) | index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    Pcg32::seed_from_u64(seed).random::<f32>()
}

/// Color assignment for every cell of `[0, rows) x [0, cols)`, row-major
pub fn generate(level: u32, rows: u32, cols: u32, palette: &[BubbleColor]) -> Vec<Bubble> {
    generate_kind(PatternKind::for_level(level), level, rows, cols, palette)
}

/// Same as [`generate`] with an explicit pattern family
pub fn generate_kind(
    kind: PatternKind,
    level: u32,
    rows: u32,
    cols: u32,
    palette: &[BubbleColor],
) -> Vec<Bubble> {
    if palette.is_empty() {
        return Vec::new();
    }
    let n = palette.len();

    match kind {
        PatternKind::Stripes => fill(rows, cols, |r, _| palette[(r / 2) as usize % n]),
        PatternKind::Checkers => fill(rows, cols, |r, c| palette[(r + c) as usize % n]),
        PatternKind::Columns => fill(rows, cols, |_, c| palette[c as usize % n]),
        PatternKind::Blobs => blobs(level, rows, cols, palette),
        PatternKind::Rings => {
            let center_r = rows as f32 / 2.0;
            let center_c = cols as f32 / 2.0;
            fill(rows, cols, |r, c| {
                let dist = ((r as f32 - center_r).powi(2) + (c as f32 - center_c).powi(2)).sqrt();
                let ring = (dist / 2.0).floor() as usize;
                palette[ring % n]
            })
        }
    }
}

fn fill(rows: u32, cols: u32, color_at: impl Fn(u32, u32) -> BubbleColor) -> Vec<Bubble> {
    let mut bubbles = Vec::with_capacity(rows as usize * cols as usize);
    for r in 0..rows {
        for c in 0..cols {
            bubbles.push(Bubble::new(CellCoord::new(r, c), color_at(r, c)));
        }
    }
    bubbles
}

fn blobs(level: u32, rows: u32, cols: u32, palette: &[BubbleColor]) -> Vec<Bubble> {
    let num_centers = (rows * cols / 15).max(3);

    // (row, col, color); row and col streams are offset so they decorrelate
    let centers: Vec<(f32, f32, BubbleColor)> = (0..num_centers)
        .map(|i| {
            let r = (seeded_unit(level, i) * rows as f32).floor();
            let c = (seeded_unit(level, i + 100) * cols as f32).floor();
            (r, c, palette[i as usize % palette.len()])
        })
        .collect();

    fill(rows, cols, |r, c| {
        let mut best = palette[0];
        let mut best_dist = f32::INFINITY;
        for &(cr, cc, color) in &centers {
            let dist = ((r as f32 - cr).powi(2) + (c as f32 - cc).powi(2)).sqrt();
            // First center wins ties
            if dist < best_dist {
                best_dist = dist;
                best = color;
            }
        }
        best
    })
}
