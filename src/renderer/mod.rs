//! Software rendering module
//!
//! Entities draw block shapes into a CPU frame buffer, which is handed to a
//! [`Surface`] for presentation.

pub mod frame;
pub mod shapes;

pub use frame::{Frame, HeadlessSurface, PresentStatus, Rgba, Surface};

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::opaque(0, 0, 0);
    pub const PLAYER_TANK: Rgba = Rgba::opaque(60, 200, 90);
    pub const ENEMY_TANK: Rgba = Rgba::opaque(210, 60, 50);
    pub const BOMB_FLAME: Rgba = Rgba::opaque(255, 140, 20);
    pub const BOMB_CORE: Rgba = Rgba::opaque(255, 235, 120);
}
