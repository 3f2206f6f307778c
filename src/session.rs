//! Shot budget and score tally
//!
//! The engine reads the shot budget to gate firing and reports score deltas,
//! but owns neither. These are the default collaborators used by the demo
//! binary and the tests.

use serde::{Deserialize, Serialize};

use crate::consts::CONTINUE_EXTRA_SHOTS;

/// Read-only view of the externally owned shot counter
pub trait ShotBudget {
    fn shots_remaining(&self) -> u32;

    fn has_shots(&self) -> bool {
        self.shots_remaining() > 0
    }
}

impl ShotBudget for u32 {
    fn shots_remaining(&self) -> u32 {
        *self
    }
}

/// Shots left in the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShotCounter {
    pub remaining: u32,
}

impl ShotCounter {
    pub fn new(shots: u32) -> Self {
        Self { remaining: shots }
    }

    /// Spend one shot. Returns false if none were left.
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Add shots (continuation)
    pub fn grant(&mut self, extra: u32) {
        self.remaining = self.remaining.saturating_add(extra);
        log::info!("Granted {} extra shots ({} remaining)", extra, self.remaining);
    }

    /// Standard continuation grant
    pub fn grant_continue(&mut self) {
        self.grant(CONTINUE_EXTRA_SHOTS);
    }
}

impl ShotBudget for ShotCounter {
    fn shots_remaining(&self) -> u32 {
        self.remaining
    }
}

/// Score accumulated in the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreTally {
    pub score: u64,
    /// Score that earns the level's star rating
    pub target: u32,
}

impl ScoreTally {
    pub fn new(target: u32) -> Self {
        Self { score: 0, target }
    }

    pub fn add(&mut self, delta: u32) {
        self.score += delta as u64;
    }

    pub fn target_reached(&self) -> bool {
        self.score >= self.target as u64
    }
}
