//! A playable level: generated dungeon, its enemies and the level's own
//! random stream.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::constants::*;
use crate::dungeon_gen::{Dungeon, DungeonGenerator};
use crate::enemy_manager::EnemyManager;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{collides_any, Rect};
use crate::player::Player;
use crate::render::{palette, Canvas};
use crate::room::{random_coord, RoomType};

/// Result of one simulation tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    GameOver,
    LevelComplete,
}

pub struct Level {
    pub dungeon: Dungeon,
    pub enemies: EnemyManager,
    config: GameConfig,
    rng: StdRng,
    events: EventQueue,
}

impl Level {
    /// Generate a fresh level. The same seed and config always produce the
    /// same level and the same enemy behavior.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let dungeon = DungeonGenerator::generate(config, &mut rng);
        info!(seed, "level created");

        Self {
            dungeon,
            enemies: EnemyManager::new(&config.spawning),
            config: config.clone(),
            rng,
            events: EventQueue::new(),
        }
    }

    pub fn start_position(&self) -> Vec2 {
        self.dungeon.start_position
    }

    /// Enemies first, then battery pickups, then the exit
    pub fn update(&mut self, player: &mut Player) -> Outcome {
        puffin::profile_function!();

        let outcome = self
            .enemies
            .update(player, &self.dungeon, &mut self.rng, &mut self.events);
        if outcome == Outcome::GameOver {
            return Outcome::GameOver;
        }

        self.collect_batteries(player);

        if player.rect.intersects(&self.dungeon.exit) {
            info!("exit reached");
            self.events.push(GameEvent::LevelComplete);
            return Outcome::LevelComplete;
        }

        Outcome::Continue
    }

    fn collect_batteries(&mut self, player: &mut Player) {
        let (picked, kept): (Vec<Rect>, Vec<Rect>) = self
            .dungeon
            .batteries
            .iter()
            .partition(|battery| battery.intersects(&player.rect));
        if picked.is_empty() {
            return;
        }
        self.dungeon.batteries = kept;

        for battery in picked {
            player.flashlight.recharge(self.config.gameplay.battery_charge);
            self.events.push(GameEvent::BatteryPickup {
                position: battery.center(),
                battery: player.flashlight.battery,
            });

            if self.rng.gen_bool(self.config.gameplay.battery_respawn_chance) {
                let placed = self.add_battery(None);
                debug!(placed, "battery respawn");
            }
        }
    }

    /// Add a battery centered on `at`, or at a random free spot in a random
    /// room. Returns false when the spot is blocked or no spot was found.
    pub fn add_battery(&mut self, at: Option<Vec2>) -> bool {
        let battery = match at {
            Some(center) => Rect::from_center(center, BATTERY_SIZE, BATTERY_SIZE),
            None => match self.random_battery_spot() {
                Some(rect) => rect,
                None => return false,
            },
        };

        if !self.is_free_battery_spot(&battery) {
            return false;
        }
        self.dungeon.batteries.push(battery);
        true
    }

    fn random_battery_spot(&mut self) -> Option<Rect> {
        let padding = WALL_THICKNESS + BATTERY_EDGE_PADDING;
        for _ in 0..LEVEL_BATTERY_ATTEMPTS {
            let room = self.dungeon.rooms.choose(&mut self.rng)?;
            let (rect, room_type, safe_zone) = (room.rect, room.room_type, room.safe_zone);

            let x = random_coord(&mut self.rng, rect.x + padding, rect.right() - padding - BATTERY_SIZE);
            let y = random_coord(&mut self.rng, rect.y + padding, rect.bottom() - padding - BATTERY_SIZE);
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            let battery = Rect::new(x, y, BATTERY_SIZE, BATTERY_SIZE);

            if room_type == RoomType::Start && battery.intersects(&safe_zone) {
                continue;
            }
            if self.is_free_battery_spot(&battery) {
                return Some(battery);
            }
        }
        None
    }

    fn is_free_battery_spot(&self, battery: &Rect) -> bool {
        self.dungeon.bounds().contains_rect(battery)
            && !collides_any(battery, &self.dungeon.walls)
            && !collides_any(battery, &self.dungeon.batteries)
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain()
    }

    /// Walls, batteries, exit and enemies, culled to the camera view
    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera) {
        puffin::profile_function!();

        for wall in self.dungeon.walls.iter().filter(|w| camera.is_visible(w)) {
            canvas.fill_rect(camera.apply_rect(wall), palette::WALL);
        }
        for battery in self.dungeon.batteries.iter().filter(|b| camera.is_visible(b)) {
            canvas.fill_rect(camera.apply_rect(battery), palette::BATTERY);
        }
        if camera.is_visible(&self.dungeon.exit) {
            canvas.fill_rect(camera.apply_rect(&self.dungeon.exit), palette::EXIT);
        }
        self.enemies.draw(canvas, camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingCanvas;

    fn quiet_level(config: &GameConfig, seed: u64) -> (Level, Player) {
        let mut level = Level::new(config, seed);
        level.enemies.mark_initialized();
        let mut player = Player::new(level.start_position(), config);
        player.flashlight.on = false;
        (level, player)
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = GameConfig::default();
        let a = Level::new(&config, 77);
        let b = Level::new(&config, 77);
        assert_eq!(a.dungeon, b.dungeon);
    }

    #[test]
    fn test_player_starts_clear_of_walls() {
        let config = GameConfig::default();
        let (level, player) = quiet_level(&config, 3);
        assert!(!collides_any(&player.rect, &level.dungeon.walls));
    }

    #[test]
    fn test_battery_pickup_recharges_and_respawns() {
        let mut config = GameConfig::default();
        config.gameplay.battery_respawn_chance = 1.0;
        let (mut level, mut player) = quiet_level(&config, 12);
        player.flashlight.battery = 50.0;

        assert!(level.add_battery(Some(player.center())));
        let before = level.dungeon.batteries.len();

        assert_eq!(level.update(&mut player), Outcome::Continue);
        assert_eq!(player.flashlight.battery, 50.0 + BATTERY_CHARGE);
        assert!(!collides_any(&player.rect, &level.dungeon.batteries));
        // One collected, one respawned elsewhere
        assert_eq!(level.dungeon.batteries.len(), before);
        let events: Vec<_> = level.drain_events().collect();
        assert!(matches!(events[..], [GameEvent::BatteryPickup { battery, .. }] if battery == 80.0));
    }

    #[test]
    fn test_battery_pickup_without_respawn() {
        let mut config = GameConfig::default();
        config.gameplay.battery_respawn_chance = 0.0;
        let (mut level, mut player) = quiet_level(&config, 12);
        assert!(level.add_battery(Some(player.center())));
        let before = level.dungeon.batteries.len();
        level.update(&mut player);
        assert_eq!(level.dungeon.batteries.len(), before - 1);
    }

    #[test]
    fn test_add_battery_rejects_blocked_spots() {
        let config = GameConfig::default();
        let (mut level, _) = quiet_level(&config, 4);
        assert!(!level.add_battery(Some(Vec2::new(5.0, 5.0))));

        let center = level.start_position();
        assert!(level.add_battery(Some(center)));
        assert!(!level.add_battery(Some(center + Vec2::new(3.0, 3.0))));
    }

    #[test]
    fn test_random_battery_lands_inside_a_room() {
        let config = GameConfig::default();
        let (mut level, _) = quiet_level(&config, 21);
        for _ in 0..5 {
            let before = level.dungeon.batteries.len();
            assert!(level.add_battery(None));
            let battery = level.dungeon.batteries[before];
            assert!(level.dungeon.rooms.iter().any(|r| r.rect.contains_rect(&battery)));
            assert!(!collides_any(&battery, &level.dungeon.walls));
        }
    }

    #[test]
    fn test_reaching_exit_completes_level() {
        let config = GameConfig::default();
        let (mut level, mut player) = quiet_level(&config, 8);
        player.place_at(level.dungeon.exit.center());
        assert_eq!(level.update(&mut player), Outcome::LevelComplete);
        assert!(level.drain_events().any(|e| e == GameEvent::LevelComplete));
    }

    #[test]
    fn test_game_over_takes_priority_over_exit() {
        let config = GameConfig::default();
        let (mut level, mut player) = quiet_level(&config, 8);
        let exit = level.dungeon.exit.center();
        player.place_at(exit);
        let mut rng = StdRng::seed_from_u64(0);
        level.enemies.spawn(crate::enemy::EnemyKind::Shadow, exit, &mut rng);
        assert_eq!(level.update(&mut player), Outcome::GameOver);
    }

    #[test]
    fn test_draw_culls_to_camera() {
        let config = GameConfig::default();
        let (level, _) = quiet_level(&config, 8);
        let mut camera = Camera::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        camera.set_tracking_target(level.dungeon.exit.center());
        camera.update(level.dungeon.width, level.dungeon.height);

        let mut canvas = RecordingCanvas::new();
        level.draw(&mut canvas, &camera);
        assert_eq!(canvas.count_rects(palette::EXIT), 1);
        let walls = canvas.count_rects(palette::WALL);
        assert!(walls > 0 && walls < level.dungeon.walls.len());
    }
}
