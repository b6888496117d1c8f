//! The player and their flashlight.

use glam::Vec2;

use crate::camera::Camera;
use crate::config::{GameConfig, LightConfig};
use crate::constants::*;
use crate::geometry::{cast_ray, move_per_axis, Rect};
use crate::render::{palette, Canvas};

/// One tick of player intent, already translated from raw input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal movement in -1..=1
    pub dx: f32,
    /// Vertical movement in -1..=1
    pub dy: f32,
    /// World point the flashlight should face
    pub aim: Option<Vec2>,
    /// Flip the flashlight on or off
    pub toggle_light: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flashlight {
    /// Facing angle in radians
    pub angle: f32,
    pub on: bool,
    /// Charge in 0..=MAX_BATTERY
    pub battery: f32,
    /// Reach at full charge
    pub base_radius: f32,
    /// Full cone opening in radians
    pub cone_angle: f32,
    pub drain: f32,
}

impl Flashlight {
    pub fn new(config: &LightConfig) -> Self {
        Self {
            angle: 0.0,
            on: true,
            battery: MAX_BATTERY,
            base_radius: config.radius,
            cone_angle: config.cone_angle_deg.to_radians(),
            drain: config.drain_per_tick,
        }
    }

    /// Reach shrinks linearly with remaining charge
    pub fn current_radius(&self) -> f32 {
        self.base_radius * (self.battery / MAX_BATTERY)
    }

    pub fn half_angle(&self) -> f32 {
        self.cone_angle / 2.0
    }

    /// On and still has charge
    pub fn is_lit(&self) -> bool {
        self.on && self.battery > 0.0
    }

    pub fn aim_at(&mut self, origin: Vec2, target: Vec2) {
        let d = target - origin;
        if d != Vec2::ZERO {
            self.angle = d.y.atan2(d.x);
        }
    }

    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    pub fn drain_tick(&mut self) {
        if self.on {
            self.battery = (self.battery - self.drain).max(0.0);
        }
    }

    pub fn recharge(&mut self, amount: f32) {
        self.battery = (self.battery + amount).min(MAX_BATTERY);
    }

    /// Light cone clipped against walls: the origin followed by one ray hit
    /// point per step across the cone. Empty when the light is off.
    pub fn light_polygon(&self, origin: Vec2, walls: &[Rect]) -> Vec<Vec2> {
        if !self.is_lit() {
            return Vec::new();
        }

        let radius = self.current_radius();
        let start = self.angle - self.half_angle();
        let step = self.cone_angle / LIGHT_RAY_COUNT as f32;

        let mut points = Vec::with_capacity(LIGHT_RAY_COUNT + 2);
        points.push(origin);
        for i in 0..=LIGHT_RAY_COUNT {
            points.push(cast_ray(origin, start + step * i as f32, radius, walls));
        }
        points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub flashlight: Flashlight,
}

impl Player {
    pub fn new(center: Vec2, config: &GameConfig) -> Self {
        Self {
            rect: Rect::from_center(center, PLAYER_SIZE, PLAYER_SIZE),
            speed: config.gameplay.player_speed,
            flashlight: Flashlight::new(&config.light),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn place_at(&mut self, center: Vec2) {
        self.rect = Rect::from_center(center, self.rect.width, self.rect.height);
    }

    /// Aim, toggle, move and drain the battery for one tick
    pub fn handle_input(&mut self, input: &PlayerInput, walls: &[Rect]) {
        if let Some(target) = input.aim {
            self.flashlight.aim_at(self.center(), target);
        }
        if input.toggle_light {
            self.flashlight.toggle();
        }

        let dx = input.dx.clamp(-1.0, 1.0) * self.speed;
        let dy = input.dy.clamp(-1.0, 1.0) * self.speed;
        self.move_by(dx, dy, walls);

        self.flashlight.drain_tick();
    }

    /// Per-axis movement, so the player slides along walls
    pub fn move_by(&mut self, dx: f32, dy: f32, walls: &[Rect]) {
        move_per_axis(&mut self.rect, Vec2::new(dx, dy), walls);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera, walls: &[Rect]) {
        let polygon = self.flashlight.light_polygon(self.center(), walls);
        if polygon.len() >= 3 {
            let screen: Vec<Vec2> = polygon.iter().map(|p| camera.world_to_screen(*p)).collect();
            canvas.fill_polygon(&screen, palette::LIGHT);
        }
        canvas.fill_rect(camera.apply_rect(&self.rect), palette::PLAYER);
    }
}
