//! Rendering interface - the simulation describes frames, a backend draws them.
//!
//! Nothing in the core rasterizes. `Level::draw` and `EnemyManager::draw`
//! issue screen-space primitives to a [`Canvas`] supplied by the
//! application shell, after transforming world coordinates through a
//! [`Camera`](crate::camera::Camera).

use glam::Vec2;

use crate::geometry::Rect;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Colors for level geometry
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const WALL: Color = Color::rgb(30, 30, 30);
    pub const BATTERY: Color = Color::rgb(0, 255, 0);
    pub const EXIT: Color = Color::rgb(255, 0, 0);
    pub const PLAYER: Color = Color::rgb(255, 255, 255);
    pub const LIGHT: Color = Color::rgba(255, 191, 0, 180);
    /// Dims the frame behind end-of-level messages
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 150);
}

/// Drawing backend. Coordinates are screen pixels.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
}

/// A single recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rect { rect: Rect, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
}

/// Canvas that records primitives instead of drawing them.
/// Used by the headless runner and by tests.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rectangles drawn in the given color
    pub fn count_rects(&self, color: Color) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Rect { color: c, .. } if *c == color))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Rect { rect, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            color,
        });
    }
}
