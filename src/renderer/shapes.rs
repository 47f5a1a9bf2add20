//! Block shapes for tanks and bombs

use glam::IVec2;

use super::colors;
use super::frame::{Frame, Rgba};
use crate::sim::Direction;

/// Which of the 3x3 tank blocks are filled, indexed `[row][col]`.
/// Every facing fills 7 of the 9 blocks; the gaps sit beside the barrel.
pub fn tank_mask(direction: Direction) -> [[bool; 3]; 3] {
    const X: bool = true;
    const O: bool = false;
    match direction {
        Direction::Up => [[O, X, O], [X, X, X], [X, X, X]],
        Direction::Down => [[X, X, X], [X, X, X], [O, X, O]],
        Direction::Left => [[O, X, X], [X, X, X], [O, X, X]],
        Direction::Right => [[X, X, O], [X, X, X], [X, X, O]],
    }
}

/// Draw a tank as its 3x3 block silhouette
pub fn draw_tank(frame: &mut Frame, pos: IVec2, size: i32, direction: Direction, color: Rgba) {
    let distance = (size / 3).max(1);
    // One pixel of spacing between blocks, like a bevelled tile
    let width = (distance - 1).max(1);
    for (row, cells) in tank_mask(direction).iter().enumerate() {
        for (col, &filled) in cells.iter().enumerate() {
            if filled {
                let origin = pos + IVec2::new(col as i32 * distance, row as i32 * distance);
                frame.fill_rect(origin, IVec2::splat(width), color);
            }
        }
    }
}

/// Draw an explosion that shrinks as `intensity` falls from 1 to 0
pub fn draw_bomb(frame: &mut Frame, pos: IVec2, size: i32, intensity: f32) {
    let intensity = intensity.clamp(0.0, 1.0);
    let flame = (size as f32 * intensity).round() as i32;
    if flame <= 0 {
        return;
    }
    let inset = (size - flame) / 2;
    frame.fill_rect(pos + IVec2::splat(inset), IVec2::splat(flame), colors::BOMB_FLAME);

    let core = flame / 2;
    if core > 0 {
        let inset = (size - core) / 2;
        frame.fill_rect(pos + IVec2::splat(inset), IVec2::splat(core), colors::BOMB_CORE);
    }
}
