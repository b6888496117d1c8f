//! Raycasting and line-of-sight tuning.

/// Distance between samples when marching a ray
pub const RAY_STEP: f32 = 10.0;
/// Side of the square probe tested against walls at each ray/line sample
pub const PROBE_SIZE: f32 = 4.0;
