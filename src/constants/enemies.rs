//! Enemy stats and spawning constants.

use crate::render::Color;

/// Side of an enemy's square bounding box
pub const ENEMY_SIZE: f32 = 24.0;
/// Idle wander direction is re-rolled after this many ticks (inclusive range)
pub const IDLE_DURATION: (u32, u32) = (60, 120);

// SHADOW
/// Shadow movement per tick
pub const SHADOW_SPEED: f32 = 2.0;
/// Distance at which an idle shadow starts chasing
pub const SHADOW_DETECTION_RADIUS: f32 = 200.0;
/// Distance beyond which a chasing shadow gives up
pub const SHADOW_CHASE_LIMIT: f32 = 350.0;
/// Ticks a lit shadow takes to fade out
pub const SHADOW_FADE_TIME: u32 = 60;
/// Shadow body color
pub const SHADOW_COLOR: Color = Color::rgb(60, 20, 90);

// GHOST
/// Ghost movement per tick
pub const GHOST_SPEED: f32 = 2.0;
/// Ghost movement per tick while stunned by light
pub const GHOST_LIGHT_SPEED: f32 = 0.5;
/// Ticks a ghost stays stunned after the last light hit
pub const GHOST_STUN_TIME: u32 = 90;
/// Distance at which an idle ghost starts chasing
pub const GHOST_DETECTION_RADIUS: f32 = 250.0;
/// Distance beyond which a chasing ghost gives up
pub const GHOST_CHASE_LIMIT: f32 = 400.0;
/// Ghost body color
pub const GHOST_COLOR: Color = Color::rgb(180, 200, 230);
/// Ghost color while stunned
pub const GHOST_STUNNED_COLOR: Color = Color::rgb(90, 110, 255);

// SPAWNING
/// Maximum live shadows before timed spawning pauses
pub const MAX_SHADOWS: usize = 5;
/// Maximum live ghosts before timed spawning pauses
pub const MAX_GHOSTS: usize = 3;
/// Ticks between timed shadow spawns (10 seconds)
pub const SHADOW_SPAWN_INTERVAL: u32 = 600;
/// Ticks between timed ghost spawns (15 seconds)
pub const GHOST_SPAWN_INTERVAL: u32 = 900;
/// Closest a new enemy may appear to the player
pub const MIN_SPAWN_DISTANCE: f32 = 300.0;
/// Farthest a distance-based spawn may appear from the player
pub const MAX_SPAWN_DISTANCE: f32 = 800.0;
/// Minimum number of enemies after the initial spawn
pub const INITIAL_ENEMY_FLOOR: usize = 6;
/// Shadows spawned per difficult room at level start
pub const DIFFICULT_ROOM_SHADOWS: usize = 3;
/// Ghosts spawned per difficult room at level start
pub const DIFFICULT_ROOM_GHOSTS: usize = 2;
/// Enemies spawned per normal room at level start
pub const NORMAL_ROOM_ENEMIES: usize = 2;
/// Attempts for the distance-based spawn fallback
pub const DISTANCE_SPAWN_ATTEMPTS: u32 = 50;
/// Attempts for the random-room spawn fallback
pub const ROOM_SPAWN_ATTEMPTS: u32 = 30;
/// Attempts for the random-map spawn fallback
pub const MAP_SPAWN_ATTEMPTS: u32 = 30;
/// Clearance against walls for fallback spawn positions
pub const SPAWN_SAFETY_MARGIN: f32 = 10.0;
