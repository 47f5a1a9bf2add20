//! Tank Fighter - a fixed-timestep 2D tank battle
//!
//! Core modules:
//! - `sim`: Simulation (occupancy grid, tanks, bullets, bombs, collisions)
//! - `renderer`: Software frame buffer and the presentation surface seam
//! - `engine`: Frame pacing and the threaded game loop
//! - `settings`: Data-driven game configuration

pub mod engine;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{EngineHandle, GameEngine, LoopState, Pacer, PacingStats, RunSummary};
pub use error::ConfigError;
pub use renderer::{Frame, HeadlessSurface, PresentStatus, Rgba, Surface};
pub use settings::{EnemyTankConfig, GameConfig, PlayerTankConfig};
pub use sim::{Action, Direction, GamePhase, GameState, Intent, OccupancyGrid};

/// Game configuration defaults
pub mod consts {
    /// Play-field width in pixels (grid columns)
    pub const DEFAULT_WIDTH: u32 = 800;
    /// Play-field height in pixels (grid rows)
    pub const DEFAULT_HEIGHT: u32 = 600;
    /// Target ticks per second
    pub const DEFAULT_FRAME_RATE: u32 = 60;

    /// Distance between the origins of two neighbouring tank blocks
    pub const TANK_BLOCK_DISTANCE: i32 = 10;
    /// Tanks are drawn as a 3x3 grid of blocks
    pub const TANK_OBJECT_SIZE: i32 = TANK_BLOCK_DISTANCE * 3;

    pub const DEFAULT_PLAYER_TANK_SPEED: i32 = 5;
    pub const DEFAULT_AI_TANK_SPEED: i32 = 2;
    pub const DEFAULT_AI_TANK_NUMBER: usize = 3;

    /// Maximum live bullets per tank
    pub const DEFAULT_BULLET_COUNT: usize = 5;
    pub const DEFAULT_BULLET_SPEED: i32 = 8;
    /// Edge length of a drawn bullet
    pub const BULLET_DRAW_SIZE: i32 = 3;

    /// Bomb live window (30 ticks = half a second at 60 Hz)
    pub const DEFAULT_BOMB_LIVE_TICKS: u32 = 30;

    /// Enemy AI sleeps this long between decisions
    pub const DEFAULT_ENEMY_THINK_MS: u64 = 250;
    pub const DEFAULT_ENEMY_FIRE_CHANCE: f64 = 0.3;

    /// Largest accepted play-field edge in pixels
    pub const MAX_RESOLUTION: u32 = 16384;

    /// Give up re-presenting a frame after this many lost-content retries
    pub const MAX_PRESENT_ATTEMPTS: u32 = 4;
}
