//! Bombs: the explosion left behind by a destroyed enemy tank.
//!
//! A bomb holds the tank's footprint on the grid for a fixed number of ticks
//! and then expires. The collision pass removes expired bombs.

use glam::IVec2;

use super::entity::{Body, Direction, Entity, EntityId, ObjectType};
use super::grid::OccupancyGrid;
use crate::renderer::{Frame, shapes};

#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    body: Body,
    live_ticks: u32,
    remaining_ticks: u32,
    destroyed: bool,
}

impl Bomb {
    /// Spawn at `pos` and occupy the footprint
    pub fn spawn(id: EntityId, pos: IVec2, size: i32, live_ticks: u32, grid: &mut OccupancyGrid) -> Self {
        let bomb = Self {
            body: Body {
                id,
                kind: ObjectType::Bomb,
                pos,
                direction: Direction::Up,
                speed: 0,
                size,
                color: crate::renderer::colors::BOMB_CORE,
            },
            live_ticks,
            remaining_ticks: live_ticks,
            destroyed: false,
        };
        bomb.body.occupy_space(grid);
        bomb
    }

    /// True until the live window has elapsed
    pub fn is_live(&self) -> bool {
        self.remaining_ticks > 0 && !self.destroyed
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// 1.0 when freshly spawned, 0.0 when expired
    pub fn intensity(&self) -> f32 {
        if self.live_ticks == 0 {
            0.0
        } else {
            self.remaining_ticks as f32 / self.live_ticks as f32
        }
    }
}

impl Entity for Bomb {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, _grid: &mut OccupancyGrid) {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
    }

    fn draw(&self, frame: &mut Frame) {
        if self.destroyed {
            return;
        }
        shapes::draw_bomb(frame, self.body.pos, self.body.size, self.intensity());
    }

    fn destroy(&mut self, grid: &mut OccupancyGrid) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.body.vacant_space(grid);
        true
    }
}
