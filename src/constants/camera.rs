//! Camera-related constants.

/// Default viewport width in screen pixels
pub const SCREEN_WIDTH: f32 = 1280.0;
/// Default viewport height in screen pixels
pub const SCREEN_HEIGHT: f32 = 720.0;
/// Default zoom level (screen pixels per world unit)
pub const CAMERA_DEFAULT_ZOOM: f32 = 1.5;
/// Minimum zoom level
pub const CAMERA_MIN_ZOOM: f32 = 0.5;
/// Maximum zoom level
pub const CAMERA_MAX_ZOOM: f32 = 2.5;
