//! Tanks
//!
//! Player and enemy tanks share one type, told apart by their
//! [`ObjectType`]. A tank owns the bullets it fired. Movement is applied by
//! the tick thread from intents, one step per tick at most.

use glam::IVec2;

use super::bullet::Bullet;
use super::entity::{Body, Direction, Entity, EntityId, ObjectType};
use super::grid::OccupancyGrid;
use crate::renderer::{Frame, shapes};
use crate::settings::TankConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    body: Body,
    bullets: Vec<Bullet>,
    bullet_cap: usize,
    dead: bool,
}

impl Tank {
    /// Build a tank from its config and occupy its footprint
    pub fn spawn(
        id: EntityId,
        kind: ObjectType,
        config: &TankConfig,
        size: i32,
        bullet_cap: usize,
        grid: &mut OccupancyGrid,
    ) -> Self {
        let tank = Self {
            body: Body {
                id,
                kind,
                pos: config.position,
                direction: config.direction,
                speed: config.speed,
                size,
                color: config.color,
            },
            bullets: Vec::with_capacity(bullet_cap),
            bullet_cap,
            dead: false,
        };
        if grid.is_occupied(tank.body.pos.y, tank.body.pos.x, size, size) {
            log::warn!("{:?} {} spawned on occupied cells at {}", kind, id, tank.body.pos);
        }
        tank.body.occupy_space(grid);
        tank
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.body.pos
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.body.direction
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.body.size
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Removal-safe access for the collision pass
    pub fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.bullets
    }

    pub fn bullet_cap(&self) -> usize {
        self.bullet_cap
    }

    /// Append a bullet. Dropped (returns false) when at the cap.
    pub fn add_bullet(&mut self, bullet: Bullet) -> bool {
        if self.bullets.len() >= self.bullet_cap {
            return false;
        }
        self.bullets.push(bullet);
        true
    }

    /// Remove a bullet by identity; `None` if it is not ours
    pub fn remove_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let index = self.bullets.iter().position(|b| b.id() == id)?;
        Some(self.bullets.remove(index))
    }

    /// Where a fresh bullet appears: just outside the facing side, centered
    pub fn muzzle(&self) -> IVec2 {
        let Body { pos, size, .. } = self.body;
        match self.body.direction {
            Direction::Up => IVec2::new(pos.x + size / 2, pos.y - 1),
            Direction::Down => IVec2::new(pos.x + size / 2, pos.y + size),
            Direction::Left => IVec2::new(pos.x - 1, pos.y + size / 2),
            Direction::Right => IVec2::new(pos.x + size, pos.y + size / 2),
        }
    }

    /// Fire along the current direction. False if dead or at the cap.
    pub fn fire(&mut self, bullet_id: EntityId, bullet_speed: i32) -> bool {
        if self.dead {
            return false;
        }
        let bullet = Bullet::new(
            bullet_id,
            self.body.id,
            self.muzzle(),
            self.body.direction,
            bullet_speed,
            self.body.color,
        );
        self.add_bullet(bullet)
    }

    /// Face a direction without moving
    pub fn turn(&mut self, direction: Direction) {
        if !self.dead {
            self.body.direction = direction;
        }
    }

    /// Face `direction` and advance `speed` cells. The move is refused when
    /// the new footprint leaves the field or overlaps another entity; the
    /// turn still happens. Returns whether the tank moved.
    pub fn step(&mut self, direction: Direction, grid: &mut OccupancyGrid) -> bool {
        if self.dead {
            return false;
        }
        self.body.direction = direction;
        if self.body.speed <= 0 {
            return false;
        }

        let target = self.body.pos.saturating_add(direction.delta() * self.body.speed);
        if !self.body.fits_at(target, grid.width(), grid.height()) {
            return false;
        }

        let size = self.body.size;
        self.body.vacant_space(grid);
        if grid.is_occupied(target.y, target.x, size, size) {
            self.body.occupy_space(grid);
            return false;
        }
        self.body.pos = target;
        self.body.occupy_space(grid);
        true
    }
}

impl Entity for Tank {
    fn body(&self) -> &Body {
        &self.body
    }

    /// Advance bullets; drop the ones that left the field
    fn update(&mut self, grid: &mut OccupancyGrid) {
        if self.dead {
            return;
        }
        let (width, height) = (grid.width(), grid.height());
        self.bullets.retain_mut(|bullet| {
            bullet.update(grid);
            bullet.within_boundary(width, height)
        });
    }

    fn draw(&self, frame: &mut Frame) {
        if self.dead {
            return;
        }
        shapes::draw_tank(frame, self.body.pos, self.body.size, self.body.direction, self.body.color);
        for bullet in &self.bullets {
            bullet.draw(frame);
        }
    }

    fn destroy(&mut self, grid: &mut OccupancyGrid) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.body.vacant_space(grid);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgba;

    fn config(x: i32, y: i32, direction: Direction) -> TankConfig {
        TankConfig {
            position: IVec2::new(x, y),
            speed: 5,
            color: Rgba::opaque(0, 200, 0),
            direction,
        }
    }

    fn tank_at(grid: &mut OccupancyGrid, x: i32, y: i32, direction: Direction) -> Tank {
        Tank::spawn(1, ObjectType::PlayerTank, &config(x, y, direction), 30, 3, grid)
    }

    #[test]
    fn test_spawn_occupies_footprint() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let tank = tank_at(&mut grid, 100, 200, Direction::Up);
        assert_eq!(grid.occupied_count(), 900);
        assert!(grid.is_cell_occupied(200, 100));
        assert!(grid.is_cell_occupied(229, 129));
        assert!(!tank.is_dead());
    }

    #[test]
    fn test_bullet_cap_drops_extra() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 200, Direction::Up);
        assert!(tank.fire(10, 8));
        assert!(tank.fire(11, 8));
        assert!(tank.fire(12, 8));
        assert!(!tank.fire(13, 8));
        assert_eq!(tank.bullets().len(), 3);
        assert!(tank.bullets().iter().all(|b| b.id() != 13));
    }

    #[test]
    fn test_remove_bullet_by_identity() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 200, Direction::Up);
        tank.fire(10, 8);
        tank.fire(11, 8);
        assert_eq!(tank.remove_bullet(10).map(|b| b.id()), Some(10));
        assert!(tank.remove_bullet(10).is_none());
        assert_eq!(tank.bullets().len(), 1);
    }

    #[test]
    fn test_muzzle_outside_footprint() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 100, Direction::Up);
        for dir in Direction::ALL {
            tank.turn(dir);
            assert!(!tank.body().contains(tank.muzzle()), "{:?}", dir);
        }
        tank.turn(Direction::Up);
        assert_eq!(tank.muzzle(), IVec2::new(115, 99));
    }

    #[test]
    fn test_update_moves_bullets_and_drops_out_of_field() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 10, Direction::Up);
        tank.fire(10, 8);
        assert_eq!(tank.bullets()[0].pos(), IVec2::new(115, 9));
        tank.update(&mut grid);
        assert_eq!(tank.bullets()[0].pos(), IVec2::new(115, 1));
        tank.update(&mut grid);
        assert!(tank.bullets().is_empty());
        assert_eq!(grid.occupied_count(), 900);
    }

    #[test]
    fn test_step_moves_footprint() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 100, Direction::Up);
        assert!(tank.step(Direction::Right, &mut grid));
        assert_eq!(tank.pos(), IVec2::new(105, 100));
        assert_eq!(tank.direction(), Direction::Right);
        assert_eq!(grid.occupied_count(), 900);
        assert!(!grid.is_cell_occupied(100, 100));
        assert!(grid.is_cell_occupied(100, 134));
    }

    #[test]
    fn test_step_blocked_by_edge_still_turns() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 0, 0, Direction::Down);
        assert!(!tank.step(Direction::Up, &mut grid));
        assert_eq!(tank.pos(), IVec2::ZERO);
        assert_eq!(tank.direction(), Direction::Up);
        assert_eq!(grid.occupied_count(), 900);
    }

    #[test]
    fn test_step_blocked_by_other_tank() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 100, Direction::Up);
        let _other = Tank::spawn(2, ObjectType::EnemyTank, &config(133, 100, Direction::Down), 30, 3, &mut grid);
        assert!(!tank.step(Direction::Right, &mut grid));
        assert_eq!(tank.pos(), IVec2::new(100, 100));
        assert_eq!(grid.occupied_count(), 1800);
        assert!(grid.is_occupied(100, 100, 30, 30));
    }

    #[test]
    fn test_destroy_vacates_once_and_stops() {
        let mut grid = OccupancyGrid::with_size(600, 800);
        let mut tank = tank_at(&mut grid, 100, 100, Direction::Up);
        tank.fire(10, 8);
        assert!(tank.destroy(&mut grid));
        assert_eq!(grid.occupied_count(), 0);
        grid.occupy(100, 100, 30, 30);
        assert!(!tank.destroy(&mut grid));
        assert_eq!(grid.occupied_count(), 900);

        assert!(!tank.fire(11, 8));
        assert!(!tank.step(Direction::Down, &mut grid));
        let before = tank.bullets()[0].pos();
        tank.update(&mut grid);
        assert_eq!(tank.bullets()[0].pos(), before);
    }
}
