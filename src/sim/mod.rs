//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only, one tick thread owns the state
//! - Drivers (enemy AI, autopilot, input) only produce intents
//! - Stable iteration order (insertion order per collection)
//! - No platform dependencies; drawing goes to a software frame

pub mod ai;
pub mod bomb;
pub mod bullet;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod handler;
pub mod intent;
pub mod state;
pub mod tank;
pub mod tick;

pub use ai::{AiWorker, Autopilot, EnemyAi};
pub use bomb::Bomb;
pub use bullet::Bullet;
pub use collision::{CollisionReport, check_for_collisions};
pub use entity::{Body, Direction, Entity, EntityId, ObjectType};
pub use grid::OccupancyGrid;
pub use handler::Handler;
pub use intent::{Action, Intent, IntentInbox, IntentSender};
pub use state::{GamePhase, GameState, IdAllocator, Rules};
pub use tank::Tank;
pub use tick::{TickReport, tick};
