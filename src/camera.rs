use crate::constants::*;
use crate::geometry::Rect;
use glam::Vec2;

/// Follow camera. `position` is the world point shown at the viewport center.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    tracking_target: Option<Vec2>,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: CAMERA_DEFAULT_ZOOM,
            viewport_width,
            viewport_height,
            tracking_target: None,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn set_tracking_target(&mut self, target: Vec2) {
        self.tracking_target = Some(target);
    }

    /// Change zoom by `delta`, clamped to the allowed range
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(CAMERA_MIN_ZOOM, CAMERA_MAX_ZOOM);
    }

    /// World-space size of the area on screen
    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height) / self.zoom
    }

    /// Center on the tracking target, keeping the view inside the map.
    /// A map smaller than the view is centered instead.
    pub fn update(&mut self, map_width: f32, map_height: f32) {
        let Some(target) = self.tracking_target else {
            return;
        };

        let half = self.view_size() / 2.0;
        self.position.x = clamp_axis(target.x, half.x, map_width);
        self.position.y = clamp_axis(target.y, half.y, map_height);
    }

    /// Visible world area
    pub fn visible_rect(&self) -> Rect {
        let size = self.view_size();
        Rect::from_center(self.position, size.x, size.y)
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        let view = self.visible_rect();
        (p - Vec2::new(view.x, view.y)) * self.zoom
    }

    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        let view = self.visible_rect();
        Vec2::new(screen_x, screen_y) / self.zoom + Vec2::new(view.x, view.y)
    }

    /// Transform a world rectangle to screen space
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let top_left = self.world_to_screen(Vec2::new(rect.x, rect.y));
        Rect::new(top_left.x, top_left.y, rect.width * self.zoom, rect.height * self.zoom)
    }

    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.visible_rect().intersects(rect)
    }
}

fn clamp_axis(target: f32, half_view: f32, map_size: f32) -> f32 {
    if map_size <= half_view * 2.0 {
        map_size / 2.0
    } else {
        target.clamp(half_view, map_size - half_view)
    }
}
