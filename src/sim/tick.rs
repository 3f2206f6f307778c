//! Fixed timestep simulation tick
//!
//! Per tick: advance projectile, check termination, resolve the snap, reveal a
//! row if anything was removed, then update the level phase.

use glam::Vec2;

use super::color::BubbleColor;
use super::projectile::Projectile;
use super::resolve::{SnapResult, resolve_snap};
use super::reveal::RevealOutcome;
use super::state::{GameState, GridEvent, LevelPhase};
use crate::error::{EngineError, FireRejection};
use crate::session::ShotBudget;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A projectile stopped this tick
    pub terminated: bool,
    /// Present when the stopped projectile was committed to the grid
    pub snap: Option<SnapResult>,
    /// Grid mutations in order
    pub events: Vec<GridEvent>,
    /// Rows revealed this tick
    pub rows_revealed: u32,
    pub level_cleared: bool,
    /// Recoverable fault hit this tick (already logged)
    pub fault: Option<EngineError>,
}

/// Launch a projectile toward `target`.
///
/// Rejected without touching the state if a projectile is in flight, the
/// budget is empty, or the level is not in play. The caller owns the budget
/// and decrements it after a successful fire.
pub fn fire(
    state: &mut GameState,
    budget: &impl ShotBudget,
    target: Vec2,
    color: BubbleColor,
    area_effect: bool,
) -> Result<Projectile, EngineError> {
    let rejection = if state.projectile.is_some() {
        Some(FireRejection::ProjectileActive)
    } else if !budget.has_shots() {
        Some(FireRejection::OutOfShots)
    } else if state.phase != LevelPhase::Playing {
        Some(FireRejection::NotPlaying)
    } else {
        None
    };
    if let Some(rejection) = rejection {
        log::debug!("Fire rejected: {}", rejection);
        return Err(EngineError::InvalidFireWhileActive(rejection));
    }

    let projectile = Projectile::launch(&state.config.launcher, target, color, area_effect);
    state.projectile = Some(projectile);
    Ok(projectile)
}

/// Fire the loaded color and promote the queued one
pub fn fire_loaded(
    state: &mut GameState,
    budget: &impl ShotBudget,
    target: Vec2,
    area_effect: bool,
) -> Result<Projectile, EngineError> {
    let color = state.loadout.loaded;
    let projectile = fire(state, budget, target, color, area_effect)?;
    state
        .loadout
        .advance(&state.grid, &state.params.palette, &mut state.rng);
    Ok(projectile)
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut GameState, budget: &impl ShotBudget, dt: f32) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    if state.phase != LevelPhase::Playing {
        return outcome;
    }
    let Some(mut projectile) = state.projectile else {
        return outcome;
    };

    let termination = projectile.advance(
        dt,
        &state.config.geometry,
        &state.grid,
        state.config.rules.collision_tolerance,
    );
    let Some(termination) = termination else {
        state.projectile = Some(projectile);
        return outcome;
    };

    state.projectile = None;
    outcome.terminated = true;
    log::debug!("Projectile stopped at {:?} ({:?})", projectile.pos, termination);

    match resolve_snap(
        &mut state.grid,
        &state.config.geometry,
        &state.config.rules,
        projectile.pos,
        projectile.color,
        projectile.area_effect,
    ) {
        Ok(snap) => {
            outcome.events.push(GridEvent::Placed(snap.placed));
            outcome
                .events
                .extend(snap.matched.iter().map(|&c| GridEvent::Popped(c)));
            outcome
                .events
                .extend(snap.dropped.iter().map(|&c| GridEvent::Dropped(c)));

            if snap.removed_any() {
                reveal_rows(state, &mut outcome);
                state
                    .loadout
                    .refresh(&state.grid, &state.params.palette, &mut state.rng);
            }
            outcome.snap = Some(snap);
        }
        Err(err) => {
            log::warn!("Projectile discarded: {}", err);
            outcome.fault = Some(err);
        }
    }

    if state.grid.is_empty() {
        state.phase = LevelPhase::Cleared;
        outcome.level_cleared = true;
        log::info!("Level {} cleared", state.params.level);
    } else if !budget.has_shots() {
        state.phase = LevelPhase::Exhausted;
        log::info!(
            "Level {} out of shots with {} bubbles left",
            state.params.level,
            state.grid.len()
        );
    }

    outcome
}

/// Reveal at most one row per removal pass.
///
/// After a removal every bubble left hangs from row 0, so an empty row 0 means
/// an empty board and the spawned row is all there is.
fn reveal_rows(state: &mut GameState, outcome: &mut TickOutcome) {
    let ceiling = state.config.shift_ceiling();
    match state.reveal.try_reveal(
        &mut state.grid,
        &state.params.palette,
        state.config.rules.reveal_fill_chance,
        ceiling,
        &mut state.rng,
    ) {
        Ok(RevealOutcome::Idle) => {}
        Ok(RevealOutcome::Revealed { spawned }) => {
            outcome.rows_revealed += 1;
            outcome.events.push(GridEvent::ShiftedDown);
            outcome.events.extend(spawned.into_iter().map(GridEvent::Spawned));
        }
        Err(err) => {
            log::warn!("Row reveal aborted: {}", err);
            outcome.fault = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::consts::SIM_DT;
    use crate::session::ShotCounter;
    use crate::sim::grid::{Bubble, OccupancyGrid};
    use crate::sim::hex::CellCoord;

    fn state() -> GameState {
        GameState::new(EngineConfig::default(), 12345).unwrap()
    }

    /// Board with a single row: `colors[i]` at (0, i)
    fn load_row(state: &mut GameState, colors: &[BubbleColor]) {
        let mut grid = OccupancyGrid::new(state.config.arena_rows(), state.params.cols);
        for (i, &color) in colors.iter().enumerate() {
            grid.insert(Bubble::new(CellCoord::new(0, i as u32), color)).unwrap();
        }
        state.grid = grid;
    }

    fn run_until_stopped(state: &mut GameState, budget: &impl ShotBudget) -> TickOutcome {
        for _ in 0..600 {
            let outcome = tick(state, budget, SIM_DT);
            if outcome.terminated {
                return outcome;
            }
        }
        panic!("projectile never stopped");
    }

    fn target_above(state: &GameState, cell: CellCoord) -> Vec2 {
        state.config.geometry.cell_to_position(cell)
    }

    #[test]
    fn test_fire_with_no_shots_is_rejected() {
        let mut state = state();
        let before = state.current_occupancy().clone();
        let err = fire(&mut state, &0u32, Vec2::new(360.0, 0.0), BubbleColor::Red, false).unwrap_err();
        assert_eq!(err, EngineError::InvalidFireWhileActive(FireRejection::OutOfShots));
        assert!(state.projectile.is_none());
        assert_eq!(state.current_occupancy(), &before);
    }

    #[test]
    fn test_fire_while_active_is_rejected() {
        let mut state = state();
        fire(&mut state, &3u32, Vec2::new(360.0, 0.0), BubbleColor::Red, false).unwrap();
        let in_flight = state.projectile;
        let err = fire(&mut state, &3u32, Vec2::new(100.0, 0.0), BubbleColor::Blue, false).unwrap_err();
        assert_eq!(err, EngineError::InvalidFireWhileActive(FireRejection::ProjectileActive));
        assert_eq!(state.projectile, in_flight);
    }

    #[test]
    fn test_fire_outside_play_is_rejected() {
        let mut state = state();
        state.phase = LevelPhase::Exhausted;
        let err = fire(&mut state, &3u32, Vec2::new(360.0, 0.0), BubbleColor::Red, false).unwrap_err();
        assert_eq!(err, EngineError::InvalidFireWhileActive(FireRejection::NotPlaying));
    }

    #[test]
    fn test_tick_without_projectile_does_nothing() {
        let mut state = state();
        let outcome = tick(&mut state, &5u32, SIM_DT);
        assert_eq!(outcome, TickOutcome::default());
    }

    #[test]
    fn test_projectile_lands_below_board() {
        let mut state = state();
        let budget = ShotCounter::new(10);
        let before = state.current_occupancy().len();
        // Straight up into the full board; cyan is not in the level 1 palette
        let target = state.config.launcher.position - Vec2::new(0.0, 500.0);
        fire(&mut state, &budget, target, BubbleColor::Cyan, false).unwrap();
        let outcome = run_until_stopped(&mut state, &budget);

        let snap = outcome.snap.unwrap();
        assert_eq!(snap.placed.cell.row, 6);
        assert!(snap.matched.is_empty());
        assert_eq!(outcome.events, vec![GridEvent::Placed(snap.placed)]);
        assert_eq!(state.current_occupancy().len(), before + 1);
        assert_eq!(state.phase, LevelPhase::Playing);
    }

    #[test]
    fn test_clearing_last_group_reveals_then_clears() {
        let mut state = state();
        state.reveal.revealed = state.reveal.total_rows;
        load_row(&mut state, &[BubbleColor::Red, BubbleColor::Red]);

        let budget = 5u32;
        let target = target_above(&state, CellCoord::new(0, 2));
        fire(&mut state, &budget, target, BubbleColor::Red, false).unwrap();
        let outcome = run_until_stopped(&mut state, &budget);

        let snap = outcome.snap.unwrap();
        assert_eq!(snap.matched.len(), 3);
        assert_eq!(snap.score_delta, 30);
        assert!(snap.board_cleared);
        assert_eq!(outcome.rows_revealed, 0);
        assert!(outcome.level_cleared);
        assert!(state.is_level_cleared());
    }

    #[test]
    fn test_empty_top_row_triggers_reveal() {
        let mut state = state();
        load_row(&mut state, &[BubbleColor::Red, BubbleColor::Red]);

        let budget = 5u32;
        let target = target_above(&state, CellCoord::new(0, 2));
        fire(&mut state, &budget, target, BubbleColor::Red, false).unwrap();
        let outcome = run_until_stopped(&mut state, &budget);

        assert_eq!(outcome.rows_revealed, 1);
        assert_eq!(state.reveal.revealed, 1);
        assert!(outcome.events.contains(&GridEvent::ShiftedDown));
        assert!(outcome.fault.is_none());
        if state.current_occupancy().is_empty() {
            assert!(state.is_level_cleared());
        } else {
            assert!(!state.current_occupancy().row_is_empty(0));
            assert_eq!(state.phase, LevelPhase::Playing);
        }
    }

    #[test]
    fn test_full_arena_discards_projectile() {
        let mut state = state();
        let mut grid = OccupancyGrid::new(state.config.arena_rows(), state.params.cols);
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let color = if (row + col) % 2 == 0 { BubbleColor::Red } else { BubbleColor::Blue };
                grid.insert(Bubble::new(CellCoord::new(row, col), color)).unwrap();
            }
        }
        state.grid = grid.clone();
        let target = state.config.launcher.position - Vec2::new(0.0, 500.0);

        fire(&mut state, &5u32, target, BubbleColor::Green, false).unwrap();
        let outcome = run_until_stopped(&mut state, &5u32);
        assert!(outcome.terminated);
        assert_eq!(outcome.fault, Some(EngineError::NoEmptyCellFound { rows: 20 }));
        assert!(outcome.snap.is_none());
        assert!(outcome.events.is_empty());
        assert!(state.projectile.is_none());
        assert_eq!(state.current_occupancy(), &grid);
        assert_eq!(state.phase, LevelPhase::Playing);

        // A discarded last shot still ends the level
        fire(&mut state, &1u32, target, BubbleColor::Green, false).unwrap();
        let outcome = run_until_stopped(&mut state, &0u32);
        assert!(outcome.fault.is_some());
        assert_eq!(state.phase, LevelPhase::Exhausted);
    }

    #[test]
    fn test_deep_hanging_column_drops_before_reveal() {
        let mut state = state();
        load_row(&mut state, &[BubbleColor::Red, BubbleColor::Red]);
        for row in 1..=10 {
            state
                .grid
                .insert(Bubble::new(CellCoord::new(row, 0), BubbleColor::Blue))
                .unwrap();
        }
        // Shifting this board as it stands would overflow
        let ceiling = state.config.shift_ceiling();
        assert!(state.grid.clone().shift_down(ceiling).is_err());

        let budget = 5u32;
        let target = target_above(&state, CellCoord::new(0, 2));
        fire(&mut state, &budget, target, BubbleColor::Red, false).unwrap();
        let outcome = run_until_stopped(&mut state, &budget);

        let snap = outcome.snap.unwrap();
        assert_eq!(snap.matched.len(), 3);
        assert_eq!(snap.dropped.len(), 10);
        assert!(outcome.fault.is_none());
        assert_eq!(outcome.rows_revealed, 1);
        assert!(state.current_occupancy().lowest_row().is_none_or(|row| row == 0));
    }

    #[test]
    fn test_last_shot_without_clear_exhausts() {
        let mut state = state();
        let mut budget = ShotCounter::new(1);
        let target = state.config.launcher.position - Vec2::new(0.0, 500.0);
        fire(&mut state, &budget, target, BubbleColor::Cyan, false).unwrap();
        budget.consume();
        run_until_stopped(&mut state, &budget);
        assert_eq!(state.phase, LevelPhase::Exhausted);

        let err = fire(&mut state, &budget, target, BubbleColor::Cyan, false).unwrap_err();
        assert_eq!(err, EngineError::InvalidFireWhileActive(FireRejection::OutOfShots));

        budget.grant_continue();
        assert!(state.resume(&budget));
        assert!(fire(&mut state, &budget, target, BubbleColor::Cyan, false).is_ok());
    }

    #[test]
    fn test_fire_loaded_promotes_queue() {
        let mut state = state();
        let queued = state.loadout.queued;
        let projectile = fire_loaded(&mut state, &3u32, Vec2::new(360.0, 0.0), false).unwrap();
        assert_eq!(state.loadout.loaded, queued);
        assert_eq!(state.projectile, Some(projectile));
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay identical
        let mut state1 = GameState::new(EngineConfig::default(), 99999).unwrap();
        let mut state2 = GameState::new(EngineConfig::default(), 99999).unwrap();
        let targets = [
            Vec2::new(200.0, 300.0),
            Vec2::new(500.0, 250.0),
            Vec2::new(360.0, 100.0),
            Vec2::new(120.0, 600.0),
        ];

        let mut budget = ShotCounter::new(targets.len() as u32);
        for &target in &targets {
            let a = fire_loaded(&mut state1, &budget, target, false);
            let b = fire_loaded(&mut state2, &budget, target, false);
            assert_eq!(a, b);
            budget.consume();
            for _ in 0..600 {
                let o1 = tick(&mut state1, &budget, SIM_DT);
                let o2 = tick(&mut state2, &budget, SIM_DT);
                assert_eq!(o1, o2);
                if o1.terminated {
                    break;
                }
            }
        }

        assert_eq!(state1.current_occupancy(), state2.current_occupancy());
        assert_eq!(state1.loadout, state2.loadout);
        assert_eq!(state1.phase, state2.phase);
    }
}
