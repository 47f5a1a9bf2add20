//! Bullets
//!
//! Bullets never touch the occupancy grid. They fly straight until they leave
//! the play field or hit a tank.

use glam::IVec2;

use super::entity::{Body, Direction, Entity, EntityId, ObjectType};
use super::grid::OccupancyGrid;
use crate::consts::BULLET_DRAW_SIZE;
use crate::renderer::{Frame, Rgba};

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    body: Body,
    /// Tank that fired it
    pub owner: EntityId,
}

impl Bullet {
    pub fn new(id: EntityId, owner: EntityId, pos: IVec2, direction: Direction, speed: i32, color: Rgba) -> Self {
        Self {
            body: Body {
                id,
                kind: ObjectType::Bullet,
                pos,
                direction,
                speed,
                size: 1,
                color,
            },
            owner,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.body.pos
    }

    pub fn set_pos(&mut self, pos: IVec2) {
        self.body.pos = pos;
    }

    /// Move `speed` along the direction, saturating at the i32 range
    pub fn advance(&mut self) {
        let step = self.body.direction.delta() * self.body.speed;
        self.body.pos = self.body.pos.saturating_add(step);
    }

    /// Still inside a `width` x `height` field
    pub fn within_boundary(&self, width: i32, height: i32) -> bool {
        let p = self.body.pos;
        p.x >= 0 && p.y >= 0 && p.x < width && p.y < height
    }

    /// Exact containment in a square footprint, upper bounds open
    pub fn hits(&self, target: &Body) -> bool {
        target.contains(self.body.pos)
    }
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, _grid: &mut OccupancyGrid) {
        self.advance();
    }

    fn draw(&self, frame: &mut Frame) {
        let half = BULLET_DRAW_SIZE / 2;
        frame.fill_rect(
            self.body.pos - IVec2::splat(half),
            IVec2::splat(BULLET_DRAW_SIZE),
            self.body.color,
        );
    }

    fn destroy(&mut self, _grid: &mut OccupancyGrid) -> bool {
        true
    }
}
