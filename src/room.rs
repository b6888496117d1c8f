//! Rooms: rectangular areas furnished with obstacles, batteries, doors and
//! candidate enemy spawn points.
//!
//! A room is built once during dungeon generation and never changes
//! afterwards. All placement is best effort: every loop has an attempt cap and
//! silently gives up on the item when the cap is reached.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::RoomConfig;
use crate::constants::*;
use crate::geometry::{collides_any, Rect};

/// Role of a room in the level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomType {
    /// Where the player starts; sparse and never hosts enemies
    Start,
    Normal,
    /// More obstacles, more batteries, more enemies
    Difficult,
    /// Holds the level exit
    Exit,
}

impl RoomType {
    /// Start and exit rooms never host enemies
    pub fn is_special(self) -> bool {
        matches!(self, RoomType::Start | RoomType::Exit)
    }
}

/// Side of a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Top, Direction::Right, Direction::Bottom, Direction::Left];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Top and bottom walls run horizontally
    pub fn is_horizontal_wall(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }
}

/// A gap in a room wall where a corridor attaches
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub rect: Rect,
    pub direction: Direction,
    /// Offset along the wall: x for top/bottom doors, y for left/right doors
    pub position: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub rect: Rect,
    pub room_type: RoomType,
    /// Boundary walls: top, left, right, bottom
    pub walls: [Rect; 4],
    pub doors: Vec<Door>,
    pub obstacles: Vec<Rect>,
    pub batteries: Vec<Rect>,
    /// Enemy spawn points (centers). Candidates after furnishing, the
    /// validated selection once the dungeon is complete.
    pub spawn_points: Vec<Vec2>,
    /// Area around the center kept free of obstacles and batteries in the start room
    pub safe_zone: Rect,
}

impl Room {
    /// Create an empty room. Sides below [`ROOM_MIN_SIZE`] are enlarged.
    pub fn new(x: f32, y: f32, width: f32, height: f32, room_type: RoomType) -> Self {
        let rect = Rect::new(x, y, width.max(ROOM_MIN_SIZE), height.max(ROOM_MIN_SIZE));
        let walls = [
            Rect::new(rect.x, rect.y, rect.width, WALL_THICKNESS),
            Rect::new(rect.x, rect.y, WALL_THICKNESS, rect.height),
            Rect::new(rect.right() - WALL_THICKNESS, rect.y, WALL_THICKNESS, rect.height),
            Rect::new(rect.x, rect.bottom() - WALL_THICKNESS, rect.width, WALL_THICKNESS),
        ];
        let safe_side = PLAYER_SIZE * 6.0;

        Self {
            rect,
            room_type,
            walls,
            doors: Vec::new(),
            obstacles: Vec::new(),
            batteries: Vec::new(),
            spawn_points: Vec::new(),
            safe_zone: Rect::from_center(rect.center(), safe_side, safe_side),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.rect.contains_point(p)
    }

    /// Number of obstacles this room asks for, before placement failures
    pub fn obstacle_budget(&self, tuning: &RoomConfig) -> usize {
        let base = (self.rect.area() / tuning.obstacle_area_divisor) as usize;
        let scale = match self.room_type {
            RoomType::Difficult => tuning.difficult_obstacle_multiplier,
            RoomType::Start => tuning.start_obstacle_multiplier,
            RoomType::Exit => tuning.exit_obstacle_multiplier,
            RoomType::Normal => 1.0,
        };
        (base as f32 * scale) as usize
    }

    /// Scatter square obstacles through the room, and next to some of them
    /// record a candidate enemy spawn point.
    pub fn generate_obstacles(&mut self, tuning: &RoomConfig, rng: &mut impl Rng) {
        let padding = WALL_THICKNESS + OBSTACLE_EDGE_PADDING;
        let spawn_chance = match self.room_type {
            RoomType::Difficult => tuning.difficult_spawn_chance,
            RoomType::Normal => tuning.normal_spawn_chance,
            RoomType::Start | RoomType::Exit => 0.0,
        };

        for _ in 0..self.obstacle_budget(tuning) {
            let size = rng.gen_range(OBSTACLE_SIZE.0..=OBSTACLE_SIZE.1) as f32;

            for _ in 0..OBSTACLE_ATTEMPTS {
                let Some(x) = random_coord(rng, self.rect.x + padding, self.rect.right() - padding - size) else {
                    break;
                };
                let Some(y) = random_coord(rng, self.rect.y + padding, self.rect.bottom() - padding - size) else {
                    break;
                };
                let obstacle = Rect::new(x, y, size, size);

                if self.room_type == RoomType::Start && obstacle.intersects(&self.safe_zone) {
                    continue;
                }
                if self.check_collision(&obstacle.grow(OBSTACLE_SPACING)) {
                    continue;
                }

                self.obstacles.push(obstacle);
                if spawn_chance > 0.0 && rng.gen_bool(spawn_chance) {
                    if let Some(point) = self.find_spawn_candidate(obstacle.center(), padding, rng) {
                        self.spawn_points.push(point);
                    }
                }
                break;
            }
        }
    }

    /// Look for a free enemy position at a random bearing around an obstacle.
    fn find_spawn_candidate(&self, anchor: Vec2, padding: f32, rng: &mut impl Rng) -> Option<Vec2> {
        let edge = padding + SPAWN_CANDIDATE_EDGE_PADDING;
        let probe_side = ENEMY_SIZE + SPAWN_CANDIDATE_MARGIN * 2.0;

        for _ in 0..SPAWN_CANDIDATE_ATTEMPTS {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(SPAWN_CANDIDATE_DISTANCE.0..=SPAWN_CANDIDATE_DISTANCE.1) as f32;
            let point = anchor + Vec2::from_angle(angle) * distance;

            if point.x < self.rect.x + edge
                || point.x > self.rect.right() - edge
                || point.y < self.rect.y + edge
                || point.y > self.rect.bottom() - edge
            {
                continue;
            }

            if !self.check_collision(&Rect::from_center(point, probe_side, probe_side)) {
                return Some(point);
            }
        }

        None
    }

    /// Doors need [`DOOR_CORNER_CLEARANCE`] on both sides along their wall.
    pub fn can_add_door(&self, direction: Direction) -> bool {
        let span = if direction.is_horizontal_wall() {
            self.rect.width
        } else {
            self.rect.height
        };
        span >= DOOR_CORNER_CLEARANCE * 2.0 + DOOR_WIDTH
    }

    /// Add a door on the given wall. `position` is the offset along the wall;
    /// a random valid one is chosen when `None`. Fails if the wall is too
    /// short or the door would overlap an existing door.
    pub fn add_door(&mut self, direction: Direction, position: Option<f32>, rng: &mut impl Rng) -> bool {
        if !self.can_add_door(direction) {
            return false;
        }

        let (start, end) = if direction.is_horizontal_wall() {
            (self.rect.x, self.rect.right())
        } else {
            (self.rect.y, self.rect.bottom())
        };
        let position = match position {
            Some(p) => p,
            None => {
                let lo = start + DOOR_CORNER_CLEARANCE;
                let hi = end - DOOR_CORNER_CLEARANCE - DOOR_WIDTH;
                match random_coord(rng, lo, hi) {
                    Some(p) => p,
                    None => lo,
                }
            }
        };

        let rect = match direction {
            Direction::Top => Rect::new(position, self.rect.y, DOOR_WIDTH, WALL_THICKNESS),
            Direction::Bottom => Rect::new(
                position,
                self.rect.bottom() - WALL_THICKNESS,
                DOOR_WIDTH,
                WALL_THICKNESS,
            ),
            Direction::Left => Rect::new(self.rect.x, position, WALL_THICKNESS, DOOR_WIDTH),
            Direction::Right => Rect::new(
                self.rect.right() - WALL_THICKNESS,
                position,
                WALL_THICKNESS,
                DOOR_WIDTH,
            ),
        };

        if self.doors.iter().any(|door| door.rect.intersects(&rect)) {
            return false;
        }

        self.doors.push(Door {
            rect,
            direction,
            position,
        });
        true
    }

    /// Try to place `count` batteries. Returns how many were placed.
    pub fn add_battery(&mut self, count: usize, rng: &mut impl Rng) -> usize {
        let padding = WALL_THICKNESS + BATTERY_EDGE_PADDING;
        let mut added = 0;
        let mut attempts_left = BATTERY_ATTEMPTS;

        while added < count && attempts_left > 0 {
            let x = random_coord(rng, self.rect.x + padding, self.rect.right() - padding - BATTERY_SIZE);
            let y = random_coord(rng, self.rect.y + padding, self.rect.bottom() - padding - BATTERY_SIZE);
            let (Some(x), Some(y)) = (x, y) else {
                break;
            };
            let battery = Rect::new(x, y, BATTERY_SIZE, BATTERY_SIZE);

            if self.room_type == RoomType::Start && battery.intersects(&self.safe_zone) {
                attempts_left -= 1;
                continue;
            }

            if self.check_collision(&battery) {
                attempts_left -= 1;
            } else {
                self.batteries.push(battery);
                added += 1;
            }
        }

        added
    }

    /// Check a rectangle against everything already in the room
    pub fn check_collision(&self, rect: &Rect) -> bool {
        collides_any(rect, &self.walls)
            || self.doors.iter().any(|door| rect.intersects(&door.rect))
            || collides_any(rect, &self.obstacles)
            || collides_any(rect, &self.batteries)
    }
}

/// Whole-unit coordinate in `[lo, hi]`, or `None` if the range is empty
pub(crate) fn random_coord(rng: &mut impl Rng, lo: f32, hi: f32) -> Option<f32> {
    let lo = lo.ceil() as i32;
    let hi = hi.floor() as i32;
    if lo > hi {
        return None;
    }
    Some(rng.gen_range(lo..=hi) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_room_is_clamped_to_min_size() {
        let room = Room::new(10.0, 20.0, 50.0, 500.0, RoomType::Normal);
        assert_eq!(room.rect, Rect::new(10.0, 20.0, ROOM_MIN_SIZE, 500.0));
    }

    #[test]
    fn test_walls_line_the_boundary() {
        let room = Room::new(0.0, 0.0, 400.0, 300.0, RoomType::Normal);
        for wall in &room.walls {
            assert!(room.rect.contains_rect(wall));
        }
        assert_eq!(room.walls[0].height, WALL_THICKNESS);
        assert_eq!(room.walls[3].y, 300.0 - WALL_THICKNESS);
    }

    #[test]
    fn test_safe_zone_is_centered() {
        let room = Room::new(100.0, 100.0, 400.0, 400.0, RoomType::Start);
        assert_eq!(room.safe_zone.center(), room.center());
        assert_eq!(room.safe_zone.width, PLAYER_SIZE * 6.0);
    }

    #[test]
    fn test_can_add_door_needs_corner_clearance() {
        let room = Room::new(0.0, 0.0, 260.0, 259.0, RoomType::Normal);
        assert!(room.can_add_door(Direction::Top));
        assert!(room.can_add_door(Direction::Bottom));
        assert!(!room.can_add_door(Direction::Left));
        assert!(!room.can_add_door(Direction::Right));
    }

    #[test]
    fn test_add_door_rejects_overlap() {
        let mut room = Room::new(0.0, 0.0, 500.0, 500.0, RoomType::Normal);
        let mut rng = rng(1);
        assert!(room.add_door(Direction::Top, Some(200.0), &mut rng));
        assert!(!room.add_door(Direction::Top, Some(230.0), &mut rng));
        assert!(room.add_door(Direction::Top, Some(260.0), &mut rng));
        assert!(room.add_door(Direction::Left, Some(200.0), &mut rng));
        assert_eq!(room.doors.len(), 3);
    }

    #[test]
    fn test_random_door_stays_clear_of_corners() {
        let mut rng = rng(7);
        for _ in 0..20 {
            let mut room = Room::new(0.0, 0.0, 400.0, 400.0, RoomType::Normal);
            assert!(room.add_door(Direction::Right, None, &mut rng));
            let door = room.doors[0];
            assert!(door.position >= DOOR_CORNER_CLEARANCE);
            assert!(door.position + DOOR_WIDTH <= 400.0 - DOOR_CORNER_CLEARANCE);
            assert_eq!(door.rect.x, 400.0 - WALL_THICKNESS);
        }
    }

    #[test]
    fn test_obstacle_budget_scales_with_type() {
        let tuning = RoomConfig::default();
        let area_side = 750.0; // 562500 / 37500 = 15
        let count = |t| Room::new(0.0, 0.0, area_side, area_side, t).obstacle_budget(&tuning);
        assert_eq!(count(RoomType::Normal), 15);
        assert_eq!(count(RoomType::Difficult), 19);
        assert_eq!(count(RoomType::Start), 4);
        assert_eq!(count(RoomType::Exit), 6);
    }

    #[test]
    fn test_obstacles_stay_inside_and_apart() {
        let tuning = RoomConfig::default();
        for seed in 0..10 {
            let mut room = Room::new(0.0, 0.0, 600.0, 600.0, RoomType::Difficult);
            room.generate_obstacles(&tuning, &mut rng(seed));
            assert!(room.obstacles.len() <= room.obstacle_budget(&tuning));
            for (i, a) in room.obstacles.iter().enumerate() {
                assert!(room.rect.contains_rect(a));
                assert!(!collides_any(a, &room.walls));
                for b in &room.obstacles[i + 1..] {
                    assert!(!a.grow(OBSTACLE_SPACING).intersects(b));
                }
            }
        }
    }

    #[test]
    fn test_start_room_keeps_safe_zone_clear() {
        let tuning = RoomConfig::default();
        for seed in 0..10 {
            let mut room = Room::new(0.0, 0.0, 560.0, 560.0, RoomType::Start);
            let mut rng = rng(seed);
            room.generate_obstacles(&tuning, &mut rng);
            room.add_battery(3, &mut rng);
            assert!(room.obstacles.iter().all(|o| !o.intersects(&room.safe_zone)));
            assert!(room.batteries.iter().all(|b| !b.intersects(&room.safe_zone)));
            assert!(room.spawn_points.is_empty());
        }
    }

    #[test]
    fn test_spawn_candidates_only_in_enemy_rooms() {
        let tuning = RoomConfig {
            difficult_spawn_chance: 1.0,
            normal_spawn_chance: 1.0,
            ..RoomConfig::default()
        };
        let mut found_any = false;
        for seed in 0..5 {
            let mut exit = Room::new(0.0, 0.0, 600.0, 600.0, RoomType::Exit);
            exit.generate_obstacles(&tuning, &mut rng(seed));
            assert!(exit.spawn_points.is_empty());

            let mut hard = Room::new(0.0, 0.0, 600.0, 600.0, RoomType::Difficult);
            hard.generate_obstacles(&tuning, &mut rng(seed));
            assert!(hard.spawn_points.len() <= hard.obstacles.len());
            for p in &hard.spawn_points {
                found_any = true;
                let edge = WALL_THICKNESS + OBSTACLE_EDGE_PADDING + SPAWN_CANDIDATE_EDGE_PADDING;
                assert!(p.x >= edge && p.x <= 600.0 - edge);
                assert!(p.y >= edge && p.y <= 600.0 - edge);
            }
        }
        assert!(found_any);
    }

    #[test]
    fn test_batteries_do_not_overlap_room_contents() {
        let mut room = Room::new(0.0, 0.0, 500.0, 500.0, RoomType::Normal);
        let mut rng = rng(3);
        room.generate_obstacles(&RoomConfig::default(), &mut rng);
        let added = room.add_battery(4, &mut rng);
        assert_eq!(added, room.batteries.len());
        for (i, battery) in room.batteries.iter().enumerate() {
            assert!(!collides_any(battery, &room.obstacles));
            assert!(!collides_any(battery, &room.walls));
            assert!(!collides_any(battery, &room.batteries[i + 1..]));
        }
    }
}
