//! Shared entity data and the capability trait every game object implements

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::OccupancyGrid;
use crate::renderer::{Frame, Rgba};

/// Stable entity identifier, allocated by [`super::GameState`]
pub type EntityId = u32;

/// Facing / travel direction. UP is towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step in (horizontal, vertical) space
    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Tag used to pick collision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    PlayerTank,
    EnemyTank,
    Bullet,
    Bomb,
}

/// Position, motion and look shared by all entities.
///
/// `pos.x` is the horizontal position (grid column), `pos.y` the vertical
/// position (grid row). Footprints are square: `[pos, pos + size)` on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub kind: ObjectType,
    pub pos: IVec2,
    pub direction: Direction,
    pub speed: i32,
    pub size: i32,
    pub color: Rgba,
}

impl Body {
    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn vertical(&self) -> i32 {
        self.pos.y
    }

    /// Center of the footprint
    pub fn center(&self) -> IVec2 {
        self.pos + IVec2::splat(self.size / 2)
    }

    /// Point-in-footprint test, upper bounds open
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.pos.x
            && point.x < self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y < self.pos.y + self.size
    }

    /// Whole footprint at `pos` lies inside a `width` x `height` field
    pub fn fits_at(&self, pos: IVec2, width: i32, height: i32) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x + self.size <= width && pos.y + self.size <= height
    }

    pub fn occupy_space(&self, grid: &mut OccupancyGrid) -> usize {
        grid.occupy(self.pos.y, self.pos.x, self.size, self.size)
    }

    pub fn vacant_space(&self, grid: &mut OccupancyGrid) -> usize {
        grid.vacate(self.pos.y, self.pos.x, self.size, self.size)
    }
}

/// Capability set of a game object
pub trait Entity {
    fn body(&self) -> &Body;

    /// Advance one tick
    fn update(&mut self, grid: &mut OccupancyGrid);

    /// Draw onto the frame. Must be idempotent, it may run twice per tick.
    fn draw(&self, frame: &mut Frame);

    /// Leave the game: vacate any grid footprint. Returns false if the entity
    /// was already destroyed, in which case nothing is touched.
    fn destroy(&mut self, grid: &mut OccupancyGrid) -> bool;

    fn id(&self) -> EntityId {
        self.body().id
    }

    fn object_type(&self) -> ObjectType {
        self.body().kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: i32, y: i32, size: i32) -> Body {
        Body {
            id: 1,
            kind: ObjectType::EnemyTank,
            pos: IVec2::new(x, y),
            direction: Direction::Down,
            speed: 1,
            size,
            color: Rgba::opaque(0, 0, 0),
        }
    }

    #[test]
    fn test_direction_deltas_are_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
            assert_eq!(dir.delta().abs().element_sum(), 1);
        }
    }

    #[test]
    fn test_contains_open_upper_bound() {
        let body = body_at(100, 100, 30);
        assert!(body.contains(IVec2::new(100, 100)));
        assert!(body.contains(IVec2::new(129, 129)));
        assert!(!body.contains(IVec2::new(130, 110)));
        assert!(!body.contains(IVec2::new(110, 130)));
        assert!(!body.contains(IVec2::new(99, 110)));
    }

    #[test]
    fn test_fits_at() {
        let body = body_at(0, 0, 30);
        assert!(body.fits_at(IVec2::new(770, 570), 800, 600));
        assert!(!body.fits_at(IVec2::new(771, 570), 800, 600));
        assert!(!body.fits_at(IVec2::new(-1, 0), 800, 600));
    }

    #[test]
    fn test_occupy_and_vacate_footprint() {
        let mut grid = OccupancyGrid::with_size(100, 100);
        let body = body_at(10, 20, 5);
        assert_eq!(body.occupy_space(&mut grid), 25);
        assert!(grid.is_cell_occupied(20, 10));
        assert!(!grid.is_cell_occupied(10, 20));
        body.vacant_space(&mut grid);
        assert_eq!(grid.occupied_count(), 0);
    }
}
