//! Offset hex coordinates and playfield geometry
//!
//! The grid uses "odd-r" offset coordinates: odd rows are shifted right by
//! half a bubble diameter. Rows grow downward from the top of the playfield,
//! and placement-space positions use screen convention (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// √3, the row pitch factor for touching circles in a hex packing
pub const SQRT_3: f32 = 1.732_050_8;

/// Neighbor offsets (Δrow, Δcol) for even rows
const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)];
/// Neighbor offsets (Δrow, Δcol) for odd rows (shifted right)
const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// Grid cell in offset coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn is_odd_row(&self) -> bool {
        self.row % 2 == 1
    }

    /// Adjacent cells under the offset layout.
    ///
    /// Cells with a negative row or a column outside `[0, cols)` are skipped.
    /// There is no lower row bound here; the occupancy arena enforces that.
    pub fn neighbors(self, cols: u32) -> impl Iterator<Item = CellCoord> {
        let dirs = if self.is_odd_row() {
            &ODD_ROW_NEIGHBORS
        } else {
            &EVEN_ROW_NEIGHBORS
        };
        dirs.iter().filter_map(move |&(dr, dc)| {
            let row = self.row.checked_add_signed(dr)?;
            let col = self.col.checked_add_signed(dc)?;
            (col < cols).then_some(CellCoord::new(row, col))
        })
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed playfield geometry for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub radius: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        let panel_x = (DESIGN_WIDTH - PANEL_WIDTH) / 2.0;
        Self {
            left: panel_x + PANEL_INSET,
            right: panel_x + PANEL_WIDTH - PANEL_INSET,
            top: PLAYFIELD_TOP,
            bottom: DESIGN_HEIGHT - PANEL_INSET,
            radius: BUBBLE_RADIUS,
        }
    }
}

impl Geometry {
    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Horizontal spacing between column centers
    #[inline]
    pub fn h_spacing(&self) -> f32 {
        self.diameter()
    }

    /// Vertical spacing between row centers
    #[inline]
    pub fn v_spacing(&self) -> f32 {
        self.radius * SQRT_3
    }

    /// Leftmost x a bubble center may reach
    #[inline]
    pub fn left_bound(&self) -> f32 {
        self.left + self.radius
    }

    /// Rightmost x a bubble center may reach
    #[inline]
    pub fn right_bound(&self) -> f32 {
        self.right - self.radius
    }

    /// A projectile center at or above this y has reached the ceiling
    #[inline]
    pub fn ceiling(&self) -> f32 {
        self.top + self.radius
    }

    /// Columns that fit the playfield, leaving room for the odd-row shift
    pub fn columns(&self) -> u32 {
        let usable = self.right - self.left;
        let fit = ((usable - self.radius) / self.h_spacing()).floor();
        if fit.is_finite() && fit > 0.0 {
            (fit as u32).max(MIN_COLUMNS)
        } else {
            MIN_COLUMNS
        }
    }

    /// Placement-space center of a cell
    pub fn cell_to_position(&self, cell: CellCoord) -> Vec2 {
        let row_offset = if cell.is_odd_row() { self.radius } else { 0.0 };
        let x = self.left + row_offset + cell.col as f32 * self.h_spacing() + self.radius;
        let y = self.top + cell.row as f32 * self.v_spacing() + self.radius;
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometry() -> Geometry {
        Geometry {
            left: 0.0,
            right: 400.0,
            top: 0.0,
            bottom: 800.0,
            radius: 10.0,
        }
    }

    #[test]
    fn test_cell_to_position_even_and_odd_rows() {
        let g = geometry();
        assert_eq!(g.cell_to_position(CellCoord::new(0, 0)), Vec2::new(10.0, 10.0));
        assert_eq!(g.cell_to_position(CellCoord::new(0, 2)), Vec2::new(50.0, 10.0));

        let odd = g.cell_to_position(CellCoord::new(1, 0));
        assert!((odd.x - 20.0).abs() < 1e-4);
        assert!((odd.y - (10.0 + 10.0 * SQRT_3)).abs() < 1e-4);
    }

    #[test]
    fn test_default_layout_columns() {
        // 544 px usable, 48 px spacing
        assert_eq!(Geometry::default().columns(), 10);

        let narrow = Geometry {
            right: 100.0,
            ..geometry()
        };
        assert_eq!(narrow.columns(), MIN_COLUMNS);
    }

    #[test]
    fn test_neighbors_even_row() {
        let mut n: Vec<_> = CellCoord::new(2, 3).neighbors(7).collect();
        n.sort();
        let mut expected = vec![
            CellCoord::new(2, 2),
            CellCoord::new(2, 4),
            CellCoord::new(1, 2),
            CellCoord::new(1, 3),
            CellCoord::new(3, 2),
            CellCoord::new(3, 3),
        ];
        expected.sort();
        assert_eq!(n, expected);
    }

    #[test]
    fn test_neighbors_odd_row() {
        let mut n: Vec<_> = CellCoord::new(1, 3).neighbors(7).collect();
        n.sort();
        let mut expected = vec![
            CellCoord::new(1, 2),
            CellCoord::new(1, 4),
            CellCoord::new(0, 3),
            CellCoord::new(0, 4),
            CellCoord::new(2, 3),
            CellCoord::new(2, 4),
        ];
        expected.sort();
        assert_eq!(n, expected);
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let n: Vec<_> = CellCoord::new(0, 0).neighbors(7).collect();
        assert_eq!(n, vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]);
    }

    #[test]
    fn test_neighbors_are_geometrically_adjacent() {
        let g = geometry();
        let cell = CellCoord::new(3, 2);
        let center = g.cell_to_position(cell);
        for n in cell.neighbors(7) {
            let d = g.cell_to_position(n).distance(center);
            assert!((d - g.diameter()).abs() < 1e-3, "{n} is {d} away");
        }
    }

    proptest! {
        #[test]
        fn prop_neighbors_within_bounds(row in 0u32..40, col in 0u32..12, cols in 1u32..12) {
            let col = col % cols;
            let n: Vec<_> = CellCoord::new(row, col).neighbors(cols).collect();
            prop_assert!(n.len() <= 6);
            for c in &n {
                prop_assert!(c.col < cols);
            }
        }

        #[test]
        fn prop_neighbors_symmetric(row in 0u32..40, col in 0u32..10) {
            let cols = 10;
            let a = CellCoord::new(row, col);
            for b in a.neighbors(cols) {
                prop_assert!(b.neighbors(cols).any(|back| back == a));
            }
        }
    }
}
