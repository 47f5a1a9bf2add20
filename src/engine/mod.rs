//! Game loop driver
//!
//! Owns the simulation on a dedicated thread, paces it to the configured
//! frame rate and hands every frame to a [`Surface`](crate::renderer::Surface).

pub mod game_loop;
pub mod pacer;

pub use game_loop::{EngineHandle, GameEngine, LoopState, RunSummary};
pub use pacer::{Pacer, PacingStats};
