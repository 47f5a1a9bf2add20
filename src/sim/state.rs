//! Game state and core simulation types
//!
//! One `GameState` owns the occupancy grid and the three entity collections.
//! Only the tick thread mutates it.

use std::collections::HashSet;

use glam::UVec2;

use super::bomb::Bomb;
use super::entity::{Entity, EntityId, ObjectType};
use super::grid::OccupancyGrid;
use super::handler::Handler;
use super::intent::{Action, Intent};
use super::tank::Tank;
use crate::error::ConfigError;
use crate::renderer::{Frame, Rgba};
use crate::settings::{GameConfig, TankConfig};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Enemies remain
    Playing,
    /// Every enemy tank destroyed
    Victory,
    /// Player tank destroyed (only when the player is vulnerable)
    Defeat,
}

impl GamePhase {
    pub fn is_finished(self) -> bool {
        self != GamePhase::Playing
    }
}

/// Tuning that stays fixed for a match
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub tank_size: i32,
    pub bullet_cap: usize,
    pub bullet_speed: i32,
    pub bomb_live_ticks: u32,
    pub player_invulnerable: bool,
    pub background: Rgba,
}

impl Rules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            tank_size: config.tank_size,
            bullet_cap: config.bullet_cap,
            bullet_speed: config.bullet_speed,
            bomb_live_ticks: config.bomb_live_ticks,
            player_invulnerable: config.player_invulnerable,
            background: config.background,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Entity id source. Ids start at 1 and wrap back to 1 after `u32::MAX`;
/// a match never holds anywhere near that many live entities.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.checked_add(1).unwrap_or(1);
        id
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: OccupancyGrid,
    /// Holds the player tank (at most one)
    pub players: Handler<Tank>,
    pub enemies: Handler<Tank>,
    pub bombs: Handler<Bomb>,
    pub phase: GamePhase,
    pub rules: Rules,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ids: IdAllocator,
}

impl GameState {
    /// Build the match described by `config`: grid, player tank, enemy tanks
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self::empty(config.resolution, Rules::from_config(config));
        state.spawn_player(&config.player);
        for enemy in &config.enemies {
            state.spawn_enemy(enemy);
        }
        Ok(state)
    }

    /// A field with no tanks
    pub fn empty(resolution: UVec2, rules: Rules) -> Self {
        Self {
            grid: OccupancyGrid::new(resolution),
            players: Handler::new(),
            enemies: Handler::new(),
            bombs: Handler::new(),
            phase: GamePhase::Playing,
            rules,
            time_ticks: 0,
            ids: IdAllocator::default(),
        }
    }

    /// Place the player tank. Replaces (and destroys) any previous one.
    pub fn spawn_player(&mut self, config: &TankConfig) -> EntityId {
        self.players.clear(&mut self.grid);
        let id = self.ids.next_id();
        let tank = Tank::spawn(
            id,
            ObjectType::PlayerTank,
            config,
            self.rules.tank_size,
            self.rules.bullet_cap,
            &mut self.grid,
        );
        self.players.add(tank);
        id
    }

    pub fn spawn_enemy(&mut self, config: &TankConfig) -> EntityId {
        let id = self.ids.next_id();
        let tank = Tank::spawn(
            id,
            ObjectType::EnemyTank,
            config,
            self.rules.tank_size,
            self.rules.bullet_cap,
            &mut self.grid,
        );
        self.enemies.add(tank);
        id
    }

    pub fn player_tank(&self) -> Option<&Tank> {
        self.players.all().first()
    }

    pub fn player_tank_mut(&mut self) -> Option<&mut Tank> {
        self.players.all_mut().first_mut()
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player_tank().map(|t| t.id())
    }

    pub fn enemy_tanks(&self) -> &[Tank] {
        self.enemies.all()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        self.players.get(id).or_else(|| self.enemies.get(id))
    }

    /// Apply driver intents. At most one `Move` per tank per call; intents for
    /// unknown or destroyed tanks are dropped. Returns how many took effect.
    pub fn apply_intents(&mut self, intents: &[Intent]) -> usize {
        let Self {
            grid,
            players,
            enemies,
            rules,
            ids,
            ..
        } = self;
        let mut moved: HashSet<EntityId> = HashSet::new();
        let mut applied = 0;

        for intent in intents {
            let Some(tank) = players.get_mut(intent.tank).or_else(|| enemies.get_mut(intent.tank)) else {
                log::trace!("dropping intent for missing tank {}", intent.tank);
                continue;
            };
            let took_effect = match intent.action {
                Action::Move(direction) => {
                    if !moved.insert(intent.tank) {
                        continue;
                    }
                    tank.step(direction, grid)
                }
                Action::Turn(direction) => {
                    tank.turn(direction);
                    true
                }
                Action::Fire => tank.fire(ids.next_id(), rules.bullet_speed),
            };
            if took_effect {
                applied += 1;
            }
        }
        applied
    }

    /// Update phase: every collection in order
    pub fn update(&mut self) {
        self.players.update(&mut self.grid);
        self.enemies.update(&mut self.grid);
        self.bombs.update(&mut self.grid);
    }

    /// Draw phase: background, then player, enemies, bombs
    pub fn draw(&self, frame: &mut Frame) {
        frame.clear(self.rules.background);
        self.players.draw(frame);
        self.enemies.draw(frame);
        self.bombs.draw(frame);
    }

    /// Remove every bomb regardless of its live window
    pub fn clear_bombs(&mut self) -> usize {
        self.bombs.clear(&mut self.grid)
    }
}
