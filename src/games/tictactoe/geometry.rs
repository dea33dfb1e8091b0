use serde::{Deserialize, Serialize};

use super::board::GRID_SIZE;
use super::rules::{LineKind, WinningLine};
use crate::core::renderer::{Point, Rect};

/// Board layout in virtual canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub line_width: f32,
    pub mark_size: f32,
    /// Distance the winning line stops short of the grid edge
    pub line_inset: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 700.0,
            cell_size: 180.0,
            offset_x: 30.0,
            offset_y: 130.0,
            line_width: 5.0,
            mark_size: 60.0,
            line_inset: 20.0,
        }
    }
}

impl BoardGeometry {
    pub fn grid_rect(&self) -> Rect {
        let side = self.cell_size * GRID_SIZE as f32;
        Rect::new(self.offset_x, self.offset_y, side, side)
    }

    /// Grid cell under `p`, if any
    pub fn cell_at(&self, p: Point) -> Option<(usize, usize)> {
        if !self.grid_rect().contains(p) {
            return None;
        }
        let col = ((p.x - self.offset_x) / self.cell_size) as usize;
        let row = ((p.y - self.offset_y) / self.cell_size) as usize;
        // float rounding right at the far edge
        Some((row.min(GRID_SIZE - 1), col.min(GRID_SIZE - 1)))
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.offset_x + col as f32 * self.cell_size,
            self.offset_y + row as f32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Point {
        self.cell_rect(row, col).center()
    }

    pub fn centroid(&self) -> Point {
        self.grid_rect().center()
    }

    /// The "Play Again" control shown on the game-over overlay
    pub fn restart_button(&self) -> Rect {
        Rect::new(self.width / 2.0 - 100.0, self.height / 2.0 + 20.0, 200.0, 50.0)
    }

    /// Start and end of the sweep drawn through a winning line
    pub fn line_endpoints(&self, line: &WinningLine) -> (Point, Point) {
        let grid = self.grid_rect();
        let (left, top) = (grid.x + self.line_inset, grid.y + self.line_inset);
        let (right, bottom) = (grid.x + grid.w - self.line_inset, grid.y + grid.h - self.line_inset);
        let half = self.cell_size / 2.0;

        match line.kind {
            LineKind::Row(r) => {
                let y = grid.y + r as f32 * self.cell_size + half;
                (Point::new(left, y), Point::new(right, y))
            }
            LineKind::Col(c) => {
                let x = grid.x + c as f32 * self.cell_size + half;
                (Point::new(x, top), Point::new(x, bottom))
            }
            LineKind::Diag(0) => (Point::new(left, top), Point::new(right, bottom)),
            LineKind::Diag(_) => (Point::new(right, top), Point::new(left, bottom)),
        }
    }
}
