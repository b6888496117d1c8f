//! Axis-aligned rectangles, ray marching and line of sight.
//!
//! Everything here is pure: given the same inputs the result is always the
//! same. These helpers are shared by enemy perception, the flashlight's light
//! polygon and every placement check in dungeon generation.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use crate::constants::{PROBE_SIZE, RAY_STEP};

/// An axis-aligned rectangle in world units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Strict overlap test: rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open point containment (left/top edges inside, right/bottom outside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle (edges may touch)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow every side outward by `amount` (negative shrinks)
    pub fn grow(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Small square probe centered on a sample point
pub fn probe_at(p: Vec2, size: f32) -> Rect {
    Rect::from_center(p, size, size)
}

/// True iff `rect` intersects any wall
pub fn collides_any(rect: &Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|wall| rect.intersects(wall))
}

/// Move X then Y, keeping each axis only if the result is clear of walls.
/// Returns which axes were blocked.
pub fn move_per_axis(rect: &mut Rect, delta: Vec2, walls: &[Rect]) -> (bool, bool) {
    let mut blocked = (false, false);

    if delta.x != 0.0 {
        let moved = rect.translate(Vec2::new(delta.x, 0.0));
        if collides_any(&moved, walls) {
            blocked.0 = true;
        } else {
            *rect = moved;
        }
    }
    if delta.y != 0.0 {
        let moved = rect.translate(Vec2::new(0.0, delta.y));
        if collides_any(&moved, walls) {
            blocked.1 = true;
        } else {
            *rect = moved;
        }
    }

    blocked
}

/// Absolute difference between two angles, normalized into `[0, PI]`
pub fn angle_between(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// March from `origin` along `angle` and return the first sample whose probe
/// hits a wall, or the point at `max_distance` if nothing is hit.
pub fn cast_ray(origin: Vec2, angle: f32, max_distance: f32, walls: &[Rect]) -> Vec2 {
    cast_ray_with(origin, angle, max_distance, walls, RAY_STEP, PROBE_SIZE)
}

/// [`cast_ray`] with explicit step and probe size
pub fn cast_ray_with(
    origin: Vec2,
    angle: f32,
    max_distance: f32,
    walls: &[Rect],
    step: f32,
    probe_size: f32,
) -> Vec2 {
    let direction = Vec2::from_angle(angle);
    if step <= 0.0 {
        return origin + direction * max_distance;
    }

    let mut distance = step;
    while distance <= max_distance {
        let sample = origin + direction * distance;
        if collides_any(&probe_at(sample, probe_size), walls) {
            return sample;
        }
        distance += step;
    }

    origin + direction * max_distance
}

/// Check for an unobstructed straight line between two points.
/// Walks the integer Bresenham line and tests a small probe at each sample.
pub fn has_line_of_sight(p1: Vec2, p2: Vec2, walls: &[Rect]) -> bool {
    has_line_of_sight_with(p1, p2, walls, PROBE_SIZE)
}

/// [`has_line_of_sight`] with an explicit probe size
pub fn has_line_of_sight_with(p1: Vec2, p2: Vec2, walls: &[Rect], probe_size: f32) -> bool {
    let start = (p1.x.round() as i32, p1.y.round() as i32);
    let end = (p2.x.round() as i32, p2.y.round() as i32);

    for (x, y) in BresenhamLine::new(start, end) {
        let probe = probe_at(Vec2::new(x as f32, y as f32), probe_size);
        if collides_any(&probe, walls) {
            return false;
        }
    }

    true
}

/// Integer points on the line between two cells, both endpoints included.
pub struct BresenhamLine {
    x: i32,
    y: i32,
    end: (i32, i32),
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        let dx = (end.0 - start.0).abs();
        let dy = (end.1 - start.1).abs();
        Self {
            x: start.0,
            y: start.1,
            end,
            dx,
            dy,
            sx: if start.0 < end.0 { 1 } else { -1 },
            sy: if start.1 < end.1 { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = (self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }
}
