//! Tunable game configuration.
//!
//! Balance knobs (densities, chances, spawn cadence, light) live here rather
//! than as literals in the simulation, so they can be iterated on from a JSON
//! file. Every field has a default taken from [`crate::constants`], and any
//! field missing from the file keeps that default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub dungeon: DungeonConfig,
    pub rooms: RoomConfig,
    pub spawning: SpawnConfig,
    pub light: LightConfig,
    pub gameplay: GameplayConfig,
}

impl GameConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, String> {
        let json_str = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&json_str).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn from_json(json_str: &str) -> Result<Self, String> {
        let config: GameConfig = serde_json::from_str(json_str).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the generator cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let d = &self.dungeon;
        if d.block_size <= 0.0 {
            return Err(format!("block_size must be positive, got {}", d.block_size));
        }
        if d.grid_size < 2 {
            return Err(format!("grid_size must be at least 2, got {}", d.grid_size));
        }
        let min_side = d.block_size * 3.0 * d.grid_size as f32;
        if d.map_width < min_side || d.map_height < min_side {
            return Err(format!(
                "map {}x{} is too small for a {}x{} room grid",
                d.map_width, d.map_height, d.grid_size, d.grid_size
            ));
        }
        // Smallest room the grid can produce must still fit a door on each wall
        let cell = (d.map_width.min(d.map_height)) / d.grid_size as f32;
        let smallest_room = (cell * ROOM_SIZE_FRACTION.0).floor().max(ROOM_MIN_SIZE);
        let door_span = DOOR_CORNER_CLEARANCE * 2.0 + DOOR_WIDTH;
        if smallest_room < door_span {
            return Err(format!(
                "map {}x{} gives rooms of {} units, doors need {}",
                d.map_width, d.map_height, smallest_room, door_span
            ));
        }

        let r = &self.rooms;
        if !(r.obstacle_area_divisor > 0.0 && r.obstacle_area_divisor.is_finite()) {
            return Err(format!(
                "obstacle_area_divisor must be positive, got {}",
                r.obstacle_area_divisor
            ));
        }
        for (name, multiplier) in [
            ("difficult_obstacle_multiplier", r.difficult_obstacle_multiplier),
            ("start_obstacle_multiplier", r.start_obstacle_multiplier),
            ("exit_obstacle_multiplier", r.exit_obstacle_multiplier),
        ] {
            if !(multiplier >= 0.0 && multiplier.is_finite()) {
                return Err(format!("{name} must be a non-negative number, got {multiplier}"));
            }
        }

        let s = &self.spawning;
        if s.min_spawn_distance > s.max_spawn_distance {
            return Err(format!(
                "min_spawn_distance ({}) exceeds max_spawn_distance ({})",
                s.min_spawn_distance, s.max_spawn_distance
            ));
        }
        for (name, chance) in [
            ("wall_fill_chance", d.wall_fill_chance),
            ("room_presence_chance", d.room_presence_chance),
            ("difficult_room_chance", d.difficult_room_chance),
            ("difficult_spawn_chance", self.rooms.difficult_spawn_chance),
            ("normal_spawn_chance", self.rooms.normal_spawn_chance),
            ("normal_battery_chance", self.rooms.normal_battery_chance),
            ("battery_respawn_chance", self.gameplay.battery_respawn_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{name} must be within 0..=1, got {chance}"));
            }
        }
        Ok(())
    }
}

/// Map and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub map_width: f32,
    pub map_height: f32,
    pub block_size: f32,
    pub wall_fill_chance: f64,
    pub grid_size: usize,
    pub room_presence_chance: f64,
    pub difficult_room_chance: f64,
    pub corridor_width: f32,
    pub extra_corridors: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            block_size: BLOCK_SIZE,
            wall_fill_chance: WALL_FILL_CHANCE,
            grid_size: ROOM_GRID_SIZE,
            room_presence_chance: ROOM_PRESENCE_CHANCE,
            difficult_room_chance: DIFFICULT_ROOM_CHANCE,
            corridor_width: CORRIDOR_WIDTH,
            extra_corridors: EXTRA_CORRIDORS,
        }
    }
}

/// Room furnishing densities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub obstacle_area_divisor: f32,
    pub difficult_obstacle_multiplier: f32,
    pub start_obstacle_multiplier: f32,
    pub exit_obstacle_multiplier: f32,
    pub difficult_spawn_chance: f64,
    pub normal_spawn_chance: f64,
    pub normal_battery_chance: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            obstacle_area_divisor: OBSTACLE_AREA_DIVISOR,
            difficult_obstacle_multiplier: DIFFICULT_OBSTACLE_MULTIPLIER,
            start_obstacle_multiplier: START_OBSTACLE_MULTIPLIER,
            exit_obstacle_multiplier: EXIT_OBSTACLE_MULTIPLIER,
            difficult_spawn_chance: DIFFICULT_SPAWN_CHANCE,
            normal_spawn_chance: NORMAL_SPAWN_CHANCE,
            normal_battery_chance: NORMAL_ROOM_BATTERY_CHANCE,
        }
    }
}

/// Enemy population and spawn cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub max_shadows: usize,
    pub max_ghosts: usize,
    pub shadow_spawn_interval: u32,
    pub ghost_spawn_interval: u32,
    pub min_spawn_distance: f32,
    pub max_spawn_distance: f32,
    pub initial_enemy_floor: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_shadows: MAX_SHADOWS,
            max_ghosts: MAX_GHOSTS,
            shadow_spawn_interval: SHADOW_SPAWN_INTERVAL,
            ghost_spawn_interval: GHOST_SPAWN_INTERVAL,
            min_spawn_distance: MIN_SPAWN_DISTANCE,
            max_spawn_distance: MAX_SPAWN_DISTANCE,
            initial_enemy_floor: INITIAL_ENEMY_FLOOR,
        }
    }
}

/// Flashlight parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub radius: f32,
    pub cone_angle_deg: f32,
    pub drain_per_tick: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            radius: LIGHT_RADIUS,
            cone_angle_deg: LIGHT_CONE_ANGLE_DEG,
            drain_per_tick: LIGHT_DRAIN,
        }
    }
}

/// Player and pickup parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub player_speed: f32,
    pub battery_charge: f32,
    pub battery_respawn_chance: f64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            battery_charge: BATTERY_CHARGE,
            battery_respawn_chance: BATTERY_RESPAWN_CHANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "gameplay": { "battery_respawn_chance": 0.5 } }"#)
            .unwrap();
        assert_eq!(config.gameplay.battery_respawn_chance, 0.5);
        assert_eq!(config.gameplay.battery_charge, BATTERY_CHARGE);
        assert_eq!(config.dungeon, DungeonConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_chance() {
        let err = GameConfig::from_json(r#"{ "dungeon": { "wall_fill_chance": 1.5 } }"#).unwrap_err();
        assert!(err.contains("wall_fill_chance"));
    }

    #[test]
    fn test_rejects_inverted_spawn_distances() {
        let err = GameConfig::from_json(
            r#"{ "spawning": { "min_spawn_distance": 900.0, "max_spawn_distance": 100.0 } }"#,
        )
        .unwrap_err();
        assert!(err.contains("min_spawn_distance"));
    }

    #[test]
    fn test_rejects_map_too_small_for_doors() {
        // 260-unit cells give 200-unit rooms, too short for a door
        let err = GameConfig::from_json(r#"{ "dungeon": { "map_width": 780.0, "map_height": 780.0 } }"#)
            .unwrap_err();
        assert!(err.contains("doors need"));

        // 450-unit cells give 270-unit rooms
        let config = GameConfig::from_json(r#"{ "dungeon": { "map_width": 1350.0, "map_height": 1350.0 } }"#);
        assert!(config.is_ok());
    }

    #[test]
    fn test_rejects_zero_obstacle_divisor() {
        let err = GameConfig::from_json(r#"{ "rooms": { "obstacle_area_divisor": 0.0 } }"#).unwrap_err();
        assert!(err.contains("obstacle_area_divisor"));
    }

    #[test]
    fn test_rejects_negative_obstacle_multiplier() {
        let err = GameConfig::from_json(r#"{ "rooms": { "exit_obstacle_multiplier": -1.0 } }"#).unwrap_err();
        assert!(err.contains("exit_obstacle_multiplier"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(GameConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = GameConfig::load(Path::new("/nonexistent/lantern.json")).unwrap_err();
        assert!(err.contains("/nonexistent/lantern.json"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
