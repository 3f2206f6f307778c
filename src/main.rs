//! Bubble Blast headless demo
//!
//! Plays a few levels with a simple autoplayer and logs what happens.
//! Run with `RUST_LOG=info` (or `debug` for per-shot detail).
//!
//! Usage: `bubble-blast [config.json] [--seed N] [--levels N]`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use bubble_blast::consts::SIM_DT;
use bubble_blast::sim::{GameState, LevelPhase, fire_loaded, tick};
use bubble_blast::{EngineConfig, ScoreTally, ShotCounter};

/// Upper bound on ticks per shot before the autoplayer gives up
const MAX_TICKS_PER_SHOT: u32 = 60 * 10;
/// Continuations granted per level
const MAX_CONTINUES: u32 = 1;

#[derive(Parser, Debug)]
#[command(about = "Play Bubble Blast levels headlessly with a simple autoplayer", version)]
struct Options {
    /// JSON engine config (partial overrides allowed)
    config: Option<PathBuf>,
    /// Seed for reveal spawns and color picks
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Levels to play before stopping
    #[arg(long, default_value_t = 3)]
    levels: u32,
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = EngineConfig::from_json(&json).with_context(|| format!("loading {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Aim at the same-color bubble whose landing cell touches the most bubbles of
/// that color. Falls back to straight up.
fn choose_target(state: &GameState) -> Vec2 {
    let color = state.loadout.loaded;
    let geometry = &state.config.geometry;
    let grid = state.current_occupancy();

    let mut best: Option<(usize, Vec2)> = None;
    for bubble in grid.iter().filter(|b| b.color == color) {
        let target = bubble.position(geometry);
        let Some(cell) = state.preview_aim(target).cell else {
            continue;
        };
        let touching = cell
            .neighbors(grid.cols())
            .filter(|&n| grid.get(n) == Some(color))
            .count();
        if touching > 0 && best.is_none_or(|(count, _)| touching > count) {
            best = Some((touching, target));
        }
    }

    best.map(|(_, target)| target)
        .unwrap_or(state.config.launcher.position - Vec2::new(0.0, 1000.0))
}

/// Play the current level to an end. Returns the final phase and score.
fn play_level(state: &mut GameState) -> (LevelPhase, ScoreTally) {
    let mut shots = ShotCounter::new(state.params.shots);
    let mut tally = ScoreTally::new(state.params.target_score);
    let mut continues = 0;

    loop {
        match state.phase {
            LevelPhase::Cleared => break,
            LevelPhase::Exhausted if continues < MAX_CONTINUES => {
                continues += 1;
                shots.grant_continue();
                state.resume(&shots);
            }
            LevelPhase::Exhausted | LevelPhase::Generating => break,
            LevelPhase::Playing => {}
        }

        let target = choose_target(state);
        if let Err(err) = fire_loaded(state, &shots, target, false) {
            log::warn!("Autoplayer could not fire: {}", err);
            break;
        }
        shots.consume();

        for _ in 0..MAX_TICKS_PER_SHOT {
            let outcome = tick(state, &shots, SIM_DT);
            if let Some(snap) = &outcome.snap {
                tally.add(snap.score_delta);
            }
            if outcome.terminated {
                break;
            }
        }
    }

    (state.phase, tally)
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let options = Options::parse();
    let config = load_config(options.config.as_ref())?;

    log::info!("Bubble Blast (headless) starting with seed {}", options.seed);
    let mut state = GameState::new(config, options.seed).context("starting level 1")?;

    for _ in 0..options.levels {
        let (phase, tally) = play_level(&mut state);
        log::info!(
            "Level {} finished {:?}: score {} / target {}{}",
            state.params.level,
            phase,
            tally.score,
            tally.target,
            if tally.target_reached() { " (target reached)" } else { "" }
        );
        if phase != LevelPhase::Cleared {
            break;
        }
        state
            .advance_level()
            .with_context(|| format!("starting level {}", state.params.level.saturating_add(1)))?;
    }
    Ok(())
}
