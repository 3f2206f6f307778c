//! Bubble colors and the fixed global palette

use serde::{Deserialize, Serialize};

/// Bubble color identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BubbleColor {
    Blue,
    Orange,
    Red,
    Green,
    Purple,
    Cyan,
}

/// Global palette in activation order. Levels use a prefix of this.
pub const PALETTE: [BubbleColor; 6] = [
    BubbleColor::Blue,
    BubbleColor::Orange,
    BubbleColor::Red,
    BubbleColor::Green,
    BubbleColor::Purple,
    BubbleColor::Cyan,
];

impl BubbleColor {
    /// 0xRRGGBB for the presentation layer
    pub fn rgb(&self) -> u32 {
        match self {
            BubbleColor::Blue => 0x0084FF,
            BubbleColor::Orange => 0xFF9500,
            BubbleColor::Red => 0xFF3B30,
            BubbleColor::Green => 0x4CD964,
            BubbleColor::Purple => 0xAF52DE,
            BubbleColor::Cyan => 0x5AC8FA,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleColor::Blue => "blue",
            BubbleColor::Orange => "orange",
            BubbleColor::Red => "red",
            BubbleColor::Green => "green",
            BubbleColor::Purple => "purple",
            BubbleColor::Cyan => "cyan",
        }
    }
}

/// First `count` palette entries (clamped to the palette size)
pub fn active_palette(count: usize) -> Vec<BubbleColor> {
    PALETTE[..count.min(PALETTE.len())].to_vec()
}
