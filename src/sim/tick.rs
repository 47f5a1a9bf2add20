//! Fixed timestep simulation tick
//!
//! Collision check strictly precedes the update phase. Drawing and
//! presentation belong to the engine.

use super::collision::{CollisionReport, check_for_collisions};
use super::intent::Intent;
use super::state::GameState;

/// Outcome of one simulation tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub collisions: CollisionReport,
    /// Intents that changed something
    pub intents_applied: usize,
    /// Tick counter after this tick
    pub tick: u64,
}

/// Advance the game by one tick: collisions, then intents and updates.
/// A finished game does not advance.
pub fn tick(state: &mut GameState, intents: &[Intent]) -> TickReport {
    if state.is_finished() {
        return TickReport {
            tick: state.time_ticks,
            ..Default::default()
        };
    }

    let collisions = check_for_collisions(state);
    let intents_applied = state.apply_intents(intents);
    state.update();
    state.time_ticks += 1;

    TickReport {
        collisions,
        intents_applied,
        tick: state.time_ticks,
    }
}
