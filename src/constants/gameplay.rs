//! Core gameplay constants (player, pickups, session timing).

/// Simulation ticks per second; all tick-based timers assume this rate
pub const TICKS_PER_SECOND: u32 = 60;

/// Side of the player's square bounding box
pub const PLAYER_SIZE: f32 = 20.0;
/// Player movement per tick
pub const PLAYER_SPEED: f32 = 4.0;

/// Side of a battery pickup
pub const BATTERY_SIZE: f32 = 15.0;
/// Battery charge restored by one pickup
pub const BATTERY_CHARGE: f32 = 30.0;
/// Chance that picking up a battery spawns a replacement elsewhere
pub const BATTERY_RESPAWN_CHANCE: f64 = 0.3;
/// Placement attempts when the level adds a battery
pub const LEVEL_BATTERY_ATTEMPTS: u32 = 50;

/// Ticks a game-over / level-complete message stays up (3 seconds)
pub const MESSAGE_DURATION: u32 = 180;
