//! Loaded and queued bubble colors
//!
//! Colors are drawn from what is still on the board so the player is never
//! handed a color that cannot match anything.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::BubbleColor;
use super::grid::OccupancyGrid;

/// The bubble in the launcher and the one waiting behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub loaded: BubbleColor,
    pub queued: BubbleColor,
}

impl Loadout {
    /// Fresh loadout for the board as it stands
    pub fn deal<R: Rng + ?Sized>(grid: &OccupancyGrid, palette: &[BubbleColor], rng: &mut R) -> Self {
        let loaded = pick_available_color(grid, palette, None, rng);
        let queued = pick_available_color(grid, palette, Some(loaded), rng);
        Self { loaded, queued }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.loaded, &mut self.queued);
    }

    /// Promote the queued color after a shot and queue a new one
    pub fn advance<R: Rng + ?Sized>(&mut self, grid: &OccupancyGrid, palette: &[BubbleColor], rng: &mut R) {
        self.loaded = self.queued;
        self.queued = pick_available_color(grid, palette, Some(self.loaded), rng);
    }

    /// Replace any held color that no longer exists on the board.
    ///
    /// An empty board keeps the current colors.
    pub fn refresh<R: Rng + ?Sized>(&mut self, grid: &OccupancyGrid, palette: &[BubbleColor], rng: &mut R) {
        let available = grid.colors_present();
        if available.is_empty() {
            return;
        }
        if !available.contains(&self.loaded) {
            self.loaded = pick_available_color(grid, palette, None, rng);
        }
        if !available.contains(&self.queued) {
            self.queued = pick_available_color(grid, palette, Some(self.loaded), rng);
        }
    }
}

/// Random color present on the board, avoiding `avoid` when there is a choice.
///
/// Falls back to the level palette when the board is empty, and to the first
/// global color when both are empty.
pub fn pick_available_color<R: Rng + ?Sized>(
    grid: &OccupancyGrid,
    palette: &[BubbleColor],
    avoid: Option<BubbleColor>,
    rng: &mut R,
) -> BubbleColor {
    let mut available = grid.colors_present();
    if available.is_empty() {
        available = palette.to_vec();
    }
    if available.is_empty() {
        return BubbleColor::Blue;
    }

    if let Some(avoid) = avoid {
        if available.len() > 1 {
            available.retain(|&c| c != avoid);
        }
    }
    available[rng.random_range(0..available.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::active_palette;
    use crate::sim::grid::Bubble;
    use crate::sim::hex::CellCoord;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid_with(colors: &[BubbleColor]) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(20, 7);
        for (i, &color) in colors.iter().enumerate() {
            grid.insert(Bubble::new(CellCoord::new(0, i as u32), color)).unwrap();
        }
        grid
    }

    #[test]
    fn test_picks_only_board_colors() {
        let grid = grid_with(&[BubbleColor::Red, BubbleColor::Green]);
        let palette = active_palette(6);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let c = pick_available_color(&grid, &palette, None, &mut rng);
            assert!(c == BubbleColor::Red || c == BubbleColor::Green);
        }
    }

    #[test]
    fn test_avoids_color_when_possible() {
        let grid = grid_with(&[BubbleColor::Red, BubbleColor::Green]);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let c = pick_available_color(&grid, &[], Some(BubbleColor::Red), &mut rng);
            assert_eq!(c, BubbleColor::Green);
        }
        let single = grid_with(&[BubbleColor::Red]);
        assert_eq!(
            pick_available_color(&single, &[], Some(BubbleColor::Red), &mut rng),
            BubbleColor::Red
        );
    }

    #[test]
    fn test_empty_board_falls_back_to_palette() {
        let grid = OccupancyGrid::new(20, 7);
        let palette = active_palette(3);
        let mut rng = Pcg32::seed_from_u64(5);
        let c = pick_available_color(&grid, &palette, None, &mut rng);
        assert!(palette.contains(&c));
        assert_eq!(pick_available_color(&grid, &[], None, &mut rng), BubbleColor::Blue);
    }

    #[test]
    fn test_swap_and_advance() {
        let grid = grid_with(&[BubbleColor::Red, BubbleColor::Green, BubbleColor::Blue]);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut loadout = Loadout {
            loaded: BubbleColor::Red,
            queued: BubbleColor::Green,
        };
        loadout.swap();
        assert_eq!(loadout.loaded, BubbleColor::Green);
        assert_eq!(loadout.queued, BubbleColor::Red);

        loadout.advance(&grid, &[], &mut rng);
        assert_eq!(loadout.loaded, BubbleColor::Red);
        assert_ne!(loadout.queued, BubbleColor::Red);
    }

    #[test]
    fn test_refresh_replaces_stale_colors() {
        let grid = grid_with(&[BubbleColor::Purple]);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut loadout = Loadout {
            loaded: BubbleColor::Red,
            queued: BubbleColor::Green,
        };
        loadout.refresh(&grid, &[], &mut rng);
        assert_eq!(loadout.loaded, BubbleColor::Purple);
        assert_eq!(loadout.queued, BubbleColor::Purple);

        let empty = OccupancyGrid::new(20, 7);
        let mut kept = Loadout {
            loaded: BubbleColor::Red,
            queued: BubbleColor::Green,
        };
        kept.refresh(&empty, &[], &mut rng);
        assert_eq!(kept.loaded, BubbleColor::Red);
    }
}
