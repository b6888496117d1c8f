//! Flashlight constants.

/// Light radius at full battery
pub const LIGHT_RADIUS: f32 = 150.0;
/// Full opening angle of the light cone, in degrees
pub const LIGHT_CONE_ANGLE_DEG: f32 = 45.0;
/// Battery drained per tick while the flashlight is on
pub const LIGHT_DRAIN: f32 = 0.1;
/// Full battery charge
pub const MAX_BATTERY: f32 = 100.0;
/// Number of rays used to build the occluded light polygon
pub const LIGHT_RAY_COUNT: usize = 24;
