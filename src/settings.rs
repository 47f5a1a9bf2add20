//! Game configuration
//!
//! Everything needed to construct a match: field resolution, frame rate,
//! tank placements and the tuning knobs for bullets, bombs and enemy AI.
//! Stored as JSON; missing fields fall back to the defaults.

use std::path::Path;
use std::time::Duration;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::renderer::{Rgba, colors};
use crate::sim::Direction;

/// Initial placement and tuning of one tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Top-left corner of the footprint (x = horizontal, y = vertical)
    pub position: IVec2,
    /// Cells per move
    pub speed: i32,
    pub color: Rgba,
    pub direction: Direction,
}

pub type PlayerTankConfig = TankConfig;
pub type EnemyTankConfig = TankConfig;

/// Full match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play-field size in pixels; also the occupancy grid size
    pub resolution: UVec2,
    /// Target ticks per second
    pub frame_rate: u32,
    pub background: Rgba,

    // === Tanks ===
    /// Edge length of every tank footprint
    pub tank_size: i32,
    pub player: PlayerTankConfig,
    pub enemies: Vec<EnemyTankConfig>,

    // === Weapons ===
    /// Live bullets per tank; firing beyond this is ignored
    pub bullet_cap: usize,
    pub bullet_speed: i32,
    /// Ticks an explosion stays on the field
    pub bomb_live_ticks: u32,

    // === Rules ===
    /// Enemy hits consume the bullet but leave the player alive
    pub player_invulnerable: bool,

    // === AI ===
    /// Pause between enemy AI decisions
    pub enemy_think_ms: u64,
    /// Probability that an enemy decision includes firing
    pub enemy_fire_chance: f64,
    /// Seed for enemy AI randomness
    pub seed: u64,
    /// Let the built-in driver steer the player tank
    pub autopilot: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_enemy_row(
            UVec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            DEFAULT_AI_TANK_NUMBER,
        )
    }
}

impl GameConfig {
    /// Classic layout: player in the middle facing up, `enemies` tanks in a
    /// row at a quarter of the height facing down, 100 px apart.
    pub fn with_enemy_row(resolution: UVec2, enemies: usize) -> Self {
        let width = resolution.x as i32;
        let height = resolution.y as i32;

        let player = TankConfig {
            position: IVec2::new(width / 2, height / 2),
            speed: DEFAULT_PLAYER_TANK_SPEED,
            color: colors::PLAYER_TANK,
            direction: Direction::Up,
        };
        let enemies = (0..enemies)
            .map(|index| TankConfig {
                position: IVec2::new(100 * (index as i32 + 1), height / 4),
                speed: DEFAULT_AI_TANK_SPEED,
                color: colors::ENEMY_TANK,
                direction: Direction::Down,
            })
            .collect();

        Self {
            resolution,
            frame_rate: DEFAULT_FRAME_RATE,
            background: colors::BACKGROUND,
            tank_size: TANK_OBJECT_SIZE,
            player,
            enemies,
            bullet_cap: DEFAULT_BULLET_COUNT,
            bullet_speed: DEFAULT_BULLET_SPEED,
            bomb_live_ticks: DEFAULT_BOMB_LIVE_TICKS,
            player_invulnerable: true,
            enemy_think_ms: DEFAULT_ENEMY_THINK_MS,
            enemy_fire_chance: DEFAULT_ENEMY_FIRE_CHANCE,
            seed: 0,
            autopilot: false,
        }
    }

    /// Time budget of one tick
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    pub fn enemy_think_interval(&self) -> Duration {
        Duration::from_millis(self.enemy_think_ms)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid("frame_rate must be > 0".into()));
        }
        if self.resolution.x == 0 || self.resolution.y == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution {}x{} has no area",
                self.resolution.x, self.resolution.y
            )));
        }
        if self.resolution.x > MAX_RESOLUTION || self.resolution.y > MAX_RESOLUTION {
            return Err(ConfigError::Invalid(format!(
                "resolution {}x{} exceeds {} on an axis",
                self.resolution.x, self.resolution.y, MAX_RESOLUTION
            )));
        }
        // Both axes are at most MAX_RESOLUTION, so these fit an i32
        let short_side = self.resolution.min_element() as i32;
        let long_side = self.resolution.max_element() as i32;
        if self.tank_size < 3 || self.tank_size > short_side {
            return Err(ConfigError::Invalid(format!(
                "tank_size {} must be between 3 and {}",
                self.tank_size, short_side
            )));
        }
        if self.bullet_speed <= 0 || self.bullet_speed > long_side {
            return Err(ConfigError::Invalid(format!(
                "bullet_speed {} must be between 1 and {}",
                self.bullet_speed, long_side
            )));
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            return Err(ConfigError::Invalid(format!(
                "enemy_fire_chance {} outside [0, 1]",
                self.enemy_fire_chance
            )));
        }

        let tanks: Vec<_> = std::iter::once(("player", &self.player))
            .chain(self.enemies.iter().map(|e| ("enemy", e)))
            .collect();
        for &(label, tank) in &tanks {
            if tank.speed < 0 || tank.speed > long_side {
                return Err(ConfigError::Invalid(format!(
                    "{} speed {} must be between 0 and {}",
                    label, tank.speed, long_side
                )));
            }
            let (x, y) = (i64::from(tank.position.x), i64::from(tank.position.y));
            let size = i64::from(self.tank_size);
            let inside = x >= 0
                && y >= 0
                && x + size <= i64::from(self.resolution.x)
                && y + size <= i64::from(self.resolution.y);
            if !inside {
                return Err(ConfigError::Invalid(format!(
                    "{} tank at {} does not fit the {}x{} field",
                    label, tank.position, self.resolution.x, self.resolution.y
                )));
            }
        }

        // A shared cell would be vacated under the surviving tank
        for (index, &(label, tank)) in tanks.iter().enumerate() {
            for &(other_label, other) in &tanks[index + 1..] {
                let gap = (tank.position - other.position).abs();
                if gap.x < self.tank_size && gap.y < self.tank_size {
                    return Err(ConfigError::Invalid(format!(
                        "{} tank at {} overlaps {} tank at {}",
                        label, tank.position, other_label, other.position
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json_pretty()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
