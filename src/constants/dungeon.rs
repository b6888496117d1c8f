//! Dungeon generation constants.

use glam::Vec2;

/// Default map width in world units
pub const MAP_WIDTH: f32 = 2400.0;
/// Default map height in world units
pub const MAP_HEIGHT: f32 = 2400.0;
/// Side of one solid fill block
pub const BLOCK_SIZE: f32 = 50.0;
/// Chance that an interior block starts solid
pub const WALL_FILL_CHANCE: f64 = 0.90;
/// Thickness of room walls and the outer map boundary
pub const WALL_THICKNESS: f32 = 20.0;

// ROOM LAYOUT
/// Rooms are laid out on an N x N grid of cells
pub const ROOM_GRID_SIZE: usize = 3;
/// Chance that a non-corner cell gets a room
pub const ROOM_PRESENCE_CHANCE: f64 = 0.8;
/// Chance that a regular room is upgraded to difficult
pub const DIFFICULT_ROOM_CHANCE: f64 = 0.25;
/// Room size as a fraction of its cell (regular rooms)
pub const ROOM_SIZE_FRACTION: (f32, f32) = (0.60, 0.80);
/// Room size as a fraction of its cell (start and exit rooms)
pub const SPECIAL_ROOM_SIZE_FRACTION: (f32, f32) = (0.70, 0.75);
/// Smallest allowed room side
pub const ROOM_MIN_SIZE: f32 = 200.0;
/// Growth of a room rect when carving blocks out of it
pub const ROOM_CARVE_MARGIN: f32 = 20.0;

// CORRIDORS AND DOORS
/// Width of every corridor section
pub const CORRIDOR_WIDTH: f32 = 80.0;
/// Random corridors added after the spanning tree to create loops
pub const EXTRA_CORRIDORS: usize = 2;
/// Width of a door gap along its wall
pub const DOOR_WIDTH: f32 = 60.0;
/// Minimum distance from a room corner to a door
pub const DOOR_CORNER_CLEARANCE: f32 = 100.0;

// OBSTACLES
/// Room area per obstacle
pub const OBSTACLE_AREA_DIVISOR: f32 = 37_500.0;
/// Obstacle count multiplier for difficult rooms
pub const DIFFICULT_OBSTACLE_MULTIPLIER: f32 = 1.3;
/// Obstacle count multiplier for the start room
pub const START_OBSTACLE_MULTIPLIER: f32 = 0.3;
/// Obstacle count multiplier for the exit room
pub const EXIT_OBSTACLE_MULTIPLIER: f32 = 0.4;
/// Obstacle side range (inclusive)
pub const OBSTACLE_SIZE: (i32, i32) = (30, 50);
/// Placement attempts per obstacle
pub const OBSTACLE_ATTEMPTS: u32 = 20;
/// Extra distance (beyond wall thickness) between obstacles and room edges
pub const OBSTACLE_EDGE_PADDING: f32 = 40.0;
/// Clearance kept around each obstacle
pub const OBSTACLE_SPACING: f32 = 15.0;

// ENEMY SPAWN CANDIDATES
/// Chance that an obstacle in a difficult room gets a spawn candidate
pub const DIFFICULT_SPAWN_CHANCE: f64 = 0.4;
/// Chance that an obstacle in a normal room gets a spawn candidate
pub const NORMAL_SPAWN_CHANCE: f64 = 0.2;
/// Attempts at placing a spawn candidate near an obstacle
pub const SPAWN_CANDIDATE_ATTEMPTS: u32 = 10;
/// Distance range of a spawn candidate from its obstacle's center
pub const SPAWN_CANDIDATE_DISTANCE: (i32, i32) = (85, 150);
/// Extra room-edge padding for spawn candidates
pub const SPAWN_CANDIDATE_EDGE_PADDING: f32 = 10.0;
/// Clearance around a spawn candidate's enemy probe inside its room
pub const SPAWN_CANDIDATE_MARGIN: f32 = 15.0;
/// Clearance against level walls when validating spawn points
pub const SPAWN_WALL_MARGIN: f32 = 10.0;
/// Clearance against other rooms' obstacles when validating spawn points
pub const SPAWN_OBSTACLE_MARGIN: f32 = 5.0;
/// Valid spawn points kept per difficult room
pub const DIFFICULT_ROOM_SPAWN_POINTS: usize = 3;
/// Valid spawn points kept per normal room
pub const NORMAL_ROOM_SPAWN_POINTS: usize = 1;

// BATTERIES
/// Extra distance (beyond wall thickness) between batteries and room edges
pub const BATTERY_EDGE_PADDING: f32 = 30.0;
/// Total placement attempts per battery request
pub const BATTERY_ATTEMPTS: u32 = 50;
/// Chance that a normal room gets a battery
pub const NORMAL_ROOM_BATTERY_CHANCE: f64 = 0.7;
/// Batteries in a difficult room
pub const DIFFICULT_ROOM_BATTERIES: usize = 2;
/// Batteries in the start room
pub const START_ROOM_BATTERIES: usize = 1;

// START AND EXIT
/// Side of the exit square
pub const EXIT_SIZE: f32 = 40.0;
/// Offset step when searching for a free exit spot
pub const EXIT_SEARCH_STEP: f32 = 25.0;
/// Maximum offset when searching for a free exit spot
pub const EXIT_SEARCH_RANGE: f32 = 50.0;
/// Player start used when no start room exists
pub const DEFAULT_START: Vec2 = Vec2::new(100.0, 100.0);
