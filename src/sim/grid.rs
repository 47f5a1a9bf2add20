//! Boolean occupancy grid
//!
//! One cell per pixel of the play field: rows are the vertical extent,
//! columns the horizontal extent. Tanks and bombs mark their footprint here
//! so that movement can refuse to walk into another entity.
//!
//! Every rectangle is clamped to the grid. Cells outside the matrix
//! (including negative coordinates) are skipped, never an error.

use glam::UVec2;

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Grid sized to a resolution (`x` = width = columns, `y` = height = rows)
    pub fn new(resolution: UVec2) -> Self {
        Self::with_size(resolution.y as usize, resolution.x as usize)
    }

    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Play-field width in pixels
    #[inline]
    pub fn width(&self) -> i32 {
        self.cols as i32
    }

    /// Play-field height in pixels
    #[inline]
    pub fn height(&self) -> i32 {
        self.rows as i32
    }

    /// Mark `[row, row+height) x [col, col+width)` occupied.
    /// Returns the number of in-bounds cells visited.
    pub fn occupy(&mut self, row: i32, col: i32, height: i32, width: i32) -> usize {
        self.fill(row, col, height, width, true)
    }

    /// Clear `[row, row+height) x [col, col+width)`.
    /// Returns the number of in-bounds cells visited.
    pub fn vacate(&mut self, row: i32, col: i32, height: i32, width: i32) -> usize {
        self.fill(row, col, height, width, false)
    }

    pub fn occupy_cell(&mut self, row: i32, col: i32) -> bool {
        self.occupy(row, col, 1, 1) == 1
    }

    pub fn vacate_cell(&mut self, row: i32, col: i32) -> bool {
        self.vacate(row, col, 1, 1) == 1
    }

    /// True if any in-bounds cell of the rectangle is occupied
    pub fn is_occupied(&self, row: i32, col: i32, height: i32, width: i32) -> bool {
        let Some((rows, cols)) = self.clamp(row, col, height, width) else {
            return false;
        };
        rows.into_iter()
            .any(|r| self.cells[r * self.cols + cols.start..r * self.cols + cols.end].contains(&true))
    }

    pub fn is_cell_occupied(&self, row: i32, col: i32) -> bool {
        self.is_occupied(row, col, 1, 1)
    }

    /// Number of occupied cells (debugging and tests)
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    fn fill(&mut self, row: i32, col: i32, height: i32, width: i32, value: bool) -> usize {
        let Some((rows, cols)) = self.clamp(row, col, height, width) else {
            return 0;
        };
        let visited = rows.len() * cols.len();
        for r in rows {
            let start = r * self.cols;
            self.cells[start + cols.start..start + cols.end].fill(value);
        }
        visited
    }

    /// Intersect the rectangle with the grid, `None` if nothing is left
    fn clamp(
        &self,
        row: i32,
        col: i32,
        height: i32,
        width: i32,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let rows = clamp_axis(row, height, self.rows)?;
        let cols = clamp_axis(col, width, self.cols)?;
        Some((rows, cols))
    }
}

fn clamp_axis(start: i32, len: i32, limit: usize) -> Option<std::ops::Range<usize>> {
    if len <= 0 {
        return None;
    }
    let start = i64::from(start);
    let end = start + i64::from(len);
    let lo = start.max(0);
    let hi = end.min(limit as i64);
    if lo >= hi {
        return None;
    }
    Some(lo as usize..hi as usize)
}
