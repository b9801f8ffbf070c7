//! Screen ↔ canvas coordinate transforms under zoom and pan.
//!
//! `to_canvas(screen) = (screen − scroll) / zoom`, with `to_screen` as the
//! inverse. Panning updates only the viewport scroll offset — node
//! coordinates are never touched, so positions stay stable while the user
//! moves around the canvas.

use serde::{Deserialize, Serialize};

/// Lower zoom bound. Matches the most zoomed-out step of the zoom control.
pub const MIN_ZOOM: f32 = 0.47;
/// Upper zoom bound.
pub const MAX_ZOOM: f32 = 3.0;

/// Multiplicative step used by keyboard/toolbar zoom commands.
const ZOOM_STEP: f32 = 1.15;

// ─── Points & rectangles ─────────────────────────────────────────────────

/// A 2D point, in either screen or canvas space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized rectangle from two corner points (any order).
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// AABB overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ─── Camera ──────────────────────────────────────────────────────────────

/// Viewport state: zoom factor plus scroll offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub zoom: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Camera {
    /// Convert a screen-space point into canvas coordinates.
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.scroll_x) / self.zoom,
            (screen.y - self.scroll_y) / self.zoom,
        )
    }

    /// Convert a canvas-space point into screen coordinates.
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.scroll_x,
            canvas.y * self.zoom + self.scroll_y,
        )
    }

    /// Pan by a screen-space delta. Only the scroll offset changes.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.scroll_x += dx;
        self.scroll_y += dy;
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }
}
