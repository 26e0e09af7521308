//! Camera: pan/zoom state for the infinite canvas and the screen↔world
//! conversions built on it.
//!
//! `pan_x` / `pan_y` are in CSS pixels, applied before the zoom scale.
//! Zoom is clamped to [`ZOOM_MIN`], [`ZOOM_MAX`] and anchored at the canvas
//! origin rather than the cursor.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_SENSITIVITY};
use crate::geom::Point;
use crate::input::WheelDelta;

/// Camera state for pan/zoom on the infinite canvas.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels, canvas-relative) to world
    /// coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Translate the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Apply a wheel event: with the zoom modifier held the vertical delta
    /// adjusts the zoom (clamped); otherwise the wheel pans.
    pub fn apply_wheel(&mut self, delta: WheelDelta, zoom_modifier: bool) {
        if zoom_modifier {
            self.zoom = (self.zoom - delta.dy * ZOOM_SENSITIVITY).clamp(ZOOM_MIN, ZOOM_MAX);
        } else {
            self.pan_x -= delta.dx;
            self.pan_y -= delta.dy;
        }
    }
}
