//! Pixel geometry of the rendered grid.
//!
//! Column width is derived the same way the dashboard renders it: the
//! container is split into 12 columns separated by `margin`, with a
//! `margin`-wide gutter on both sides.

use crate::layout::GridRect;
use crate::GRID_COLUMNS;

/// A pointer position in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if `point` lies inside the box (right and bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The same box moved by `(dx, dy)`; the size never changes.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Converts between grid units and container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub container_width: f64,
    pub row_height: f64,
    pub margin: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self::new(1200.0, 80.0, 10.0)
    }
}

impl GridMetrics {
    pub fn new(container_width: f64, row_height: f64, margin: f64) -> Self {
        Self {
            container_width,
            row_height,
            margin,
        }
    }

    /// Width of one column, never less than one pixel.
    pub fn column_width(&self) -> f64 {
        let columns = f64::from(GRID_COLUMNS);
        ((self.container_width - self.margin * (columns + 1.0)) / columns).max(1.0)
    }

    fn column_step(&self) -> f64 {
        self.column_width() + self.margin
    }

    fn row_step(&self) -> f64 {
        self.row_height.max(1.0) + self.margin
    }

    /// Pixel box of a grid rectangle.
    pub fn cell_rect(&self, rect: &GridRect) -> PixelRect {
        let (w, h) = (f64::from(rect.w), f64::from(rect.h));
        PixelRect::new(
            self.column_step() * f64::from(rect.x) + self.margin,
            self.row_step() * f64::from(rect.y) + self.margin,
            self.column_width() * w + self.margin * (w - 1.0).max(0.0),
            self.row_height.max(1.0) * h + self.margin * (h - 1.0).max(0.0),
        )
    }

    /// Snaps a box origin to the nearest cell for a widget `width` columns wide.
    ///
    /// The column is clamped so the widget stays inside the grid and the row
    /// is clamped at zero.
    pub fn snap(&self, origin: Point, width: u32) -> (u32, u32) {
        let max_x = GRID_COLUMNS - width.clamp(1, GRID_COLUMNS);
        let column = ((origin.x - self.margin) / self.column_step()).round();
        let row = ((origin.y - self.margin) / self.row_step()).round();
        let x = if column > 0.0 { (column as u32).min(max_x) } else { 0 };
        let y = if row > 0.0 { row as u32 } else { 0 };
        (x, y)
    }
}
