//! Collision detection and resolution
//!
//! Runs once per tick before the update phase:
//! 1. player bullets against enemy tanks (a hit destroys the tank and leaves a bomb)
//! 2. enemy bullets against the player tank (first hit only)
//! 3. expired bombs are swept
//! 4. an empty enemy collection finishes the match

use super::bomb::Bomb;
use super::entity::{Entity, EntityId};
use super::state::{GamePhase, GameState};

/// What the collision pass changed this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemy tanks destroyed by player bullets, in resolution order
    pub enemies_destroyed: Vec<EntityId>,
    /// Bombs spawned for those tanks
    pub bombs_spawned: Vec<EntityId>,
    /// An enemy bullet reached the player tank
    pub player_hit: bool,
    /// The hit removed the player (player not invulnerable)
    pub player_destroyed: bool,
    /// Bombs removed because their live window elapsed
    pub bombs_expired: usize,
    /// The match reached a terminal phase during this pass
    pub finished: bool,
}

pub fn check_for_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let was_finished = state.is_finished();

    resolve_player_bullets(state, &mut report);
    resolve_enemy_bullets(state, &mut report);

    let expired = state.bombs.sweep(&mut state.grid, |bomb| !bomb.is_live());
    for bomb in &expired {
        log::debug!("bomb {} expired", bomb.id());
    }
    report.bombs_expired = expired.len();

    if state.phase == GamePhase::Playing && state.enemies.is_empty() {
        log::info!("All enemy tanks destroyed after {} ticks", state.time_ticks);
        state.phase = GamePhase::Victory;
    }
    report.finished = !was_finished && state.is_finished();
    report
}

/// Each player bullet is checked against the enemies in order; the first
/// tank it hits is destroyed and the bullet is spent.
fn resolve_player_bullets(state: &mut GameState, report: &mut CollisionReport) {
    let GameState {
        grid,
        players,
        enemies,
        bombs,
        rules,
        ids,
        ..
    } = state;
    let Some(player) = players.all_mut().first_mut() else {
        return;
    };

    let bullets = player.bullets_mut();
    let mut index = 0;
    while index < bullets.len() {
        let Some(target) = enemies.iter().position(|enemy| bullets[index].hits(enemy.body())) else {
            index += 1;
            continue;
        };

        let bullet = bullets.remove(index);
        let mut enemy = enemies.all_mut().remove(target);
        // Vacate before the bomb claims the same cells
        enemy.destroy(grid);

        let bomb_id = ids.next_id();
        bombs.add(Bomb::spawn(bomb_id, enemy.pos(), enemy.size(), rules.bomb_live_ticks, grid));

        log::info!("Enemy tank {} destroyed by bullet {} at {}", enemy.id(), bullet.id(), enemy.pos());
        report.enemies_destroyed.push(enemy.id());
        report.bombs_spawned.push(bomb_id);
    }
}

/// Only the first enemy bullet found on the player is processed per tick.
fn resolve_enemy_bullets(state: &mut GameState, report: &mut CollisionReport) {
    let GameState {
        grid,
        players,
        enemies,
        rules,
        phase,
        ..
    } = state;
    let Some(player) = players.all().first() else {
        return;
    };

    for enemy in enemies.all_mut().iter_mut() {
        let Some(index) = enemy.bullets().iter().position(|b| b.hits(player.body())) else {
            continue;
        };
        let bullet = enemy.bullets_mut().remove(index);
        report.player_hit = true;
        log::info!("Player tank hit by bullet {} from enemy {}", bullet.id(), enemy.id());
        break;
    }

    if report.player_hit && !rules.player_invulnerable {
        let mut player = players.all_mut().remove(0);
        player.destroy(grid);
        report.player_destroyed = true;
        if *phase == GamePhase::Playing {
            *phase = GamePhase::Defeat;
        }
        log::info!("Player tank {} destroyed", player.id());
    }
}
