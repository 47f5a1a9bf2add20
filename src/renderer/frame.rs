//! Software frame buffer and the presentation seam
//!
//! The simulation draws into a [`Frame`]; a [`Surface`] puts finished frames
//! on screen (or anywhere else). Surfaces may lose the presented contents, in
//! which case the loop redraws and presents again.

use bytemuck::{Pod, Zeroable};
use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A drawable frame at the play-field resolution
#[derive(Debug, Clone)]
pub struct Frame {
    size: UVec2,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            pixels: vec![Rgba::zeroed(); (size.x as usize) * (size.y as usize)],
        }
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Fill the whole frame
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill an axis-aligned rectangle, clipped to the frame
    pub fn fill_rect(&mut self, origin: IVec2, size: IVec2, color: Rgba) {
        let min = origin.max(IVec2::ZERO);
        let max = (origin + size).min(self.size.as_ivec2());
        if min.x >= max.x || min.y >= max.y {
            return;
        }
        let width = self.size.x as usize;
        for y in min.y as usize..max.y as usize {
            let row = y * width;
            self.pixels[row + min.x as usize..row + max.x as usize].fill(color);
        }
    }

    /// Pixel at `pos`, `None` outside the frame
    pub fn pixel(&self, pos: IVec2) -> Option<Rgba> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.size.x as i32 || pos.y >= self.size.y as i32 {
            return None;
        }
        Some(self.pixels[pos.y as usize * self.size.x as usize + pos.x as usize])
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels matching `color`
    pub fn count_color(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }
}

/// Result of handing a frame to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    /// Frame is on screen
    Presented,
    /// Buffer contents were lost, redraw and present again
    ContentsLost,
}

/// Presentation collaborator (window, canvas, test harness)
pub trait Surface {
    /// Resolution frames must be drawn at
    fn resolution(&self) -> UVec2;

    /// Show a finished frame
    fn present(&mut self, frame: &Frame) -> PresentStatus;
}

/// Surface with no display. Records what was presented; can simulate
/// lost buffer contents for a number of upcoming presents.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    resolution: UVec2,
    presented: u64,
    lost: u64,
    pending_losses: u32,
    last_frame: Vec<u8>,
}

impl HeadlessSurface {
    pub fn new(resolution: UVec2) -> Self {
        Self {
            resolution,
            presented: 0,
            lost: 0,
            pending_losses: 0,
            last_frame: Vec::new(),
        }
    }

    /// Report lost contents for the next `count` presents
    pub fn lose_contents(&mut self, count: u32) {
        self.pending_losses += count;
    }

    /// Frames that made it to "screen"
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Presents that reported lost contents
    pub fn lost(&self) -> u64 {
        self.lost
    }

    /// Bytes of the most recently presented frame
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }
}

impl Surface for HeadlessSurface {
    fn resolution(&self) -> UVec2 {
        self.resolution
    }

    fn present(&mut self, frame: &Frame) -> PresentStatus {
        if self.pending_losses > 0 {
            self.pending_losses -= 1;
            self.lost += 1;
            return PresentStatus::ContentsLost;
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame.as_bytes());
        self.presented += 1;
        PresentStatus::Presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    #[test]
    fn test_fill_rect_clips() {
        let mut frame = Frame::new(UVec2::new(10, 10));
        frame.fill_rect(IVec2::new(-5, 8), IVec2::new(8, 8), RED);
        assert_eq!(frame.count_color(RED), 3 * 2);
        assert_eq!(frame.pixel(IVec2::new(0, 9)), Some(RED));
        assert_eq!(frame.pixel(IVec2::new(3, 9)), Some(Rgba::zeroed()));
        assert_eq!(frame.pixel(IVec2::new(10, 9)), None);
    }

    #[test]
    fn test_fill_rect_outside_is_noop() {
        let mut frame = Frame::new(UVec2::new(10, 10));
        frame.fill_rect(IVec2::new(20, 20), IVec2::new(3, 3), RED);
        frame.fill_rect(IVec2::new(2, 2), IVec2::new(0, 3), RED);
        assert_eq!(frame.count_color(RED), 0);
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut frame = Frame::new(UVec2::new(2, 1));
        frame.fill_rect(IVec2::new(1, 0), IVec2::ONE, Rgba::new(1, 2, 3, 4));
        assert_eq!(frame.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_headless_loses_then_presents() {
        let mut surface = HeadlessSurface::new(UVec2::new(2, 2));
        let frame = Frame::new(surface.resolution());
        surface.lose_contents(2);
        assert_eq!(surface.present(&frame), PresentStatus::ContentsLost);
        assert_eq!(surface.present(&frame), PresentStatus::ContentsLost);
        assert_eq!(surface.present(&frame), PresentStatus::Presented);
        assert_eq!(surface.lost(), 2);
        assert_eq!(surface.presented(), 1);
        assert_eq!(surface.last_frame().len(), 16);
    }
}
