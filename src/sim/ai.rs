//! Tank drivers
//!
//! - [`EnemyAi`]: seeded random wandering and firing, run by an [`AiWorker`]
//!   thread per enemy tank that only posts intents.
//! - [`Autopilot`]: demo driver for the player tank, evaluated on the tick
//!   thread. Lines up with the nearest enemy and fires.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Direction, Entity, EntityId};
use super::intent::{Action, Intent, IntentSender};
use super::state::GameState;

/// Chance per decision that an enemy picks a new heading
const TURN_CHANCE: f64 = 0.2;

/// Random wandering enemy brain
#[derive(Debug, Clone)]
pub struct EnemyAi {
    tank: EntityId,
    rng: Pcg32,
    heading: Direction,
    fire_chance: f64,
}

impl EnemyAi {
    pub fn new(tank: EntityId, seed: u64, heading: Direction, fire_chance: f64) -> Self {
        Self {
            tank,
            rng: Pcg32::seed_from_u64(seed),
            heading,
            fire_chance: fire_chance.clamp(0.0, 1.0),
        }
    }

    pub fn tank(&self) -> EntityId {
        self.tank
    }

    /// One decision: keep (or change) heading and step, maybe fire
    pub fn decide(&mut self) -> Vec<Intent> {
        if self.rng.random_bool(TURN_CHANCE) {
            self.heading = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
        }
        let mut intents = vec![Intent::new(self.tank, Action::Move(self.heading))];
        if self.rng.random_bool(self.fire_chance) {
            intents.push(Intent::new(self.tank, Action::Fire));
        }
        intents
    }
}

/// Background thread driving one enemy tank
#[derive(Debug)]
pub struct AiWorker {
    tank: EntityId,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AiWorker {
    /// Think every `interval` until stopped or the inbox goes away
    pub fn spawn(mut ai: EnemyAi, intents: IntentSender, interval: Duration) -> std::io::Result<Self> {
        let tank = ai.tank();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(format!("enemy-ai-{}", tank))
            .spawn(move || {
                log::debug!("enemy AI {} started", tank);
                // Stop signal or a dropped sender both end the loop
                while let Err(RecvTimeoutError::Timeout) = stop_rx.recv_timeout(interval) {
                    for intent in ai.decide() {
                        if intents.send(intent).is_err() {
                            log::debug!("enemy AI {} lost its inbox", tank);
                            return;
                        }
                    }
                }
                log::debug!("enemy AI {} stopped", tank);
            })?;
        Ok(Self {
            tank,
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn tank(&self) -> EntityId {
        self.tank
    }

    /// Signal the thread and wait for it
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("enemy AI {} panicked", self.tank);
        }
    }
}

impl Drop for AiWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Player driver for unattended runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn decide(state: &GameState) -> Vec<Intent> {
        let Some(player) = state.player_tank() else {
            return Vec::new();
        };
        let center = player.body().center();
        let Some(target) = state
            .enemy_tanks()
            .iter()
            .min_by_key(|enemy| (enemy.body().center() - center).abs().element_sum())
        else {
            return Vec::new();
        };

        let id = player.id();
        let delta = target.body().center() - center;
        let tolerance = player.size() / 3;

        let facing = if delta.x.abs() <= tolerance {
            Some(if delta.y < 0 { Direction::Up } else { Direction::Down })
        } else if delta.y.abs() <= tolerance {
            Some(if delta.x < 0 { Direction::Left } else { Direction::Right })
        } else {
            None
        };

        match facing {
            Some(direction) => vec![
                Intent::new(id, Action::Turn(direction)),
                Intent::new(id, Action::Fire),
            ],
            None => {
                // Close the smaller gap first to line up sooner
                let direction = if delta.x.abs() < delta.y.abs() {
                    if delta.x < 0 { Direction::Left } else { Direction::Right }
                } else if delta.y < 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                vec![Intent::new(id, Action::Move(direction))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::intent::IntentInbox;
    use glam::{IVec2, UVec2};

    #[test]
    fn test_enemy_ai_is_deterministic() {
        let mut a = EnemyAi::new(3, 42, Direction::Down, 0.5);
        let mut b = EnemyAi::new(3, 42, Direction::Down, 0.5);
        for _ in 0..50 {
            assert_eq!(a.decide(), b.decide());
        }
    }

    #[test]
    fn test_enemy_ai_always_moves_own_tank() {
        let mut ai = EnemyAi::new(9, 7, Direction::Left, 0.0);
        for _ in 0..20 {
            let intents = ai.decide();
            assert_eq!(intents.len(), 1);
            assert_eq!(intents[0].tank, 9);
            assert!(matches!(intents[0].action, Action::Move(_)));
        }
    }

    #[test]
    fn test_enemy_ai_fires_when_certain() {
        let mut ai = EnemyAi::new(1, 7, Direction::Left, 1.0);
        assert!(ai.decide().contains(&Intent::new(1, Action::Fire)));
    }

    #[test]
    fn test_worker_posts_and_stops() {
        let inbox = IntentInbox::new();
        let ai = EnemyAi::new(5, 1, Direction::Down, 0.0);
        let mut worker = AiWorker::spawn(ai, inbox.sender(), Duration::from_millis(1)).unwrap();
        let mut received = Vec::new();
        for _ in 0..1000 {
            received.extend(inbox.drain());
            if !received.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        worker.stop();
        assert!(!received.is_empty());
        assert!(received.iter().all(|i| i.tank == 5));

        // Nothing arrives after stop() returns
        inbox.drain();
        thread::sleep(Duration::from_millis(5));
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn test_autopilot_fires_when_aligned() {
        let mut config = GameConfig::with_enemy_row(UVec2::new(400, 300), 1);
        config.player.position = IVec2::new(105, 200);
        config.enemies[0].position = IVec2::new(100, 40);
        let state = GameState::new(&config).unwrap();
        let id = state.player_id().unwrap();
        assert_eq!(
            Autopilot::decide(&state),
            vec![
                Intent::new(id, Action::Turn(Direction::Up)),
                Intent::new(id, Action::Fire)
            ]
        );
    }

    #[test]
    fn test_autopilot_lines_up_first() {
        let mut config = GameConfig::with_enemy_row(UVec2::new(400, 300), 1);
        config.player.position = IVec2::new(200, 200);
        config.enemies[0].position = IVec2::new(100, 40);
        let state = GameState::new(&config).unwrap();
        let id = state.player_id().unwrap();
        assert_eq!(
            Autopilot::decide(&state),
            vec![Intent::new(id, Action::Move(Direction::Left))]
        );
    }

    #[test]
    fn test_autopilot_idle_without_enemies() {
        let config = GameConfig::with_enemy_row(UVec2::new(400, 300), 0);
        let state = GameState::new(&config).unwrap();
        assert!(Autopilot::decide(&state).is_empty());
    }
}
