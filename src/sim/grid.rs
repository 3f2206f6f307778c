//! Occupancy store: the authoritative cell -> color mapping
//!
//! Backed by a fixed-capacity row-major arena instead of an open-ended map,
//! so the row ceiling is structural: a cell outside the arena can never be
//! occupied, and row-major iteration gives a stable scan order.

use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::hex::{CellCoord, Geometry};
use crate::error::EngineError;

/// A bubble committed to the grid. Its position is always derived from the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub cell: CellCoord,
    pub color: BubbleColor,
}

impl Bubble {
    pub fn new(cell: CellCoord, color: BubbleColor) -> Self {
        Self { cell, color }
    }

    pub fn position(&self, geometry: &Geometry) -> glam::Vec2 {
        geometry.cell_to_position(self.cell)
    }
}

/// Bounded hex grid arena
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    rows: u32,
    cols: u32,
    cells: Vec<Option<BubbleColor>>,
    occupied: usize,
}

impl OccupancyGrid {
    /// Empty arena with `rows` x `cols` capacity
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
            occupied: 0,
        }
    }

    /// Arena row capacity
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    #[inline]
    fn index(&self, cell: CellCoord) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.cols as usize + cell.col as usize)
    }

    pub fn get(&self, cell: CellCoord) -> Option<BubbleColor> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    #[inline]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some()
    }

    /// Commit a bubble to an empty cell
    pub fn insert(&mut self, bubble: Bubble) -> Result<(), EngineError> {
        let i = self
            .index(bubble.cell)
            .ok_or(EngineError::CellOutOfArena(bubble.cell))?;
        if self.cells[i].is_some() {
            return Err(EngineError::DuplicatePlacementAttempt(bubble.cell));
        }
        self.cells[i] = Some(bubble.color);
        self.occupied += 1;
        Ok(())
    }

    /// Remove a bubble, returning its color if the cell was occupied
    pub fn remove(&mut self, cell: CellCoord) -> Option<BubbleColor> {
        let i = self.index(cell)?;
        let removed = self.cells[i].take();
        if removed.is_some() {
            self.occupied -= 1;
        }
        removed
    }

    /// Number of occupied cells
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Bubble> + '_ {
        let cols = self.cols as usize;
        self.cells.iter().enumerate().filter_map(move |(i, color)| {
            color.map(|color| {
                let cell = CellCoord::new((i / cols) as u32, (i % cols) as u32);
                Bubble::new(cell, color)
            })
        })
    }

    /// Occupied cells of one row
    pub fn row(&self, row: u32) -> impl Iterator<Item = Bubble> + '_ {
        (0..self.cols).filter_map(move |col| {
            let cell = CellCoord::new(row, col);
            self.get(cell).map(|color| Bubble::new(cell, color))
        })
    }

    pub fn row_is_empty(&self, row: u32) -> bool {
        self.row(row).next().is_none()
    }

    /// Lowest occupied row, if any
    pub fn lowest_row(&self) -> Option<u32> {
        self.iter().map(|b| b.cell.row).max()
    }

    /// Distinct colors currently on the board, in palette order
    pub fn colors_present(&self) -> Vec<BubbleColor> {
        let mut colors: Vec<_> = self.iter().map(|b| b.color).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    /// Move every bubble down one row.
    ///
    /// All-or-nothing: if any bubble would land below `ceiling` (or outside the
    /// arena) the grid is left untouched.
    pub fn shift_down(&mut self, ceiling: u32) -> Result<(), EngineError> {
        if let Some(lowest) = self.lowest_row() {
            let row = lowest + 1;
            if row > ceiling || row >= self.rows {
                return Err(EngineError::RowShiftOverflow {
                    row,
                    ceiling: ceiling.min(self.rows.saturating_sub(1)),
                });
            }
        }
        let cols = self.cols as usize;
        self.cells.rotate_right(cols);
        self.cells[..cols].fill(None);
        Ok(())
    }
}
