//! Procedural dungeon generation.
//!
//! The map starts as a field of solid blocks. Rooms are laid out on a coarse
//! grid and carved out, joined by L-shaped corridors along a minimum spanning
//! tree (plus a few extra corridors for loops), and any room that is still
//! unreachable from the start room is connected explicitly. The remaining
//! blocks, the map boundary and every room obstacle become the flat wall list
//! used for all collision checks.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::constants::*;
use crate::geometry::{collides_any, Rect};
use crate::room::{Direction, Room, RoomType};

/// A corridor between two room centers: two straight sections meeting at a bend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corridor {
    pub sections: [Rect; 2],
    /// Bounding rectangle of both sections
    pub bounds: Rect,
    /// Indices of the rooms this corridor was built to join
    pub rooms: (usize, usize),
}

impl Corridor {
    /// L-shaped corridor of the given width from `start` to `end`.
    /// The bend is at `(end.x, start.y)` when going horizontally first,
    /// `(start.x, end.y)` otherwise.
    pub fn between(start: Vec2, end: Vec2, width: f32, horizontal_first: bool, rooms: (usize, usize)) -> Self {
        let bend = bend_point(start, end, horizontal_first);
        let sections = [segment_rect(start, bend, width), segment_rect(bend, end, width)];
        Self {
            sections,
            bounds: sections[0].union(&sections[1]),
            rooms,
        }
    }

    /// Check if a rectangle overlaps either section
    pub fn touches(&self, rect: &Rect) -> bool {
        self.sections.iter().any(|s| s.intersects(rect))
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.sections.iter().any(|s| s.contains_point(p))
    }
}

fn bend_point(start: Vec2, end: Vec2, horizontal_first: bool) -> Vec2 {
    if horizontal_first {
        Vec2::new(end.x, start.y)
    } else {
        Vec2::new(start.x, end.y)
    }
}

/// Legs under one unit long carry no direction
fn is_degenerate((from, to): (Vec2, Vec2)) -> bool {
    from.distance(to) < 1.0
}

/// Straight axis-aligned segment thickened to `width`, extended by half the
/// width past both ends so consecutive sections overlap at the bend.
fn segment_rect(from: Vec2, to: Vec2, width: f32) -> Rect {
    let min = from.min(to);
    let max = from.max(to);
    Rect::new(
        min.x - width / 2.0,
        min.y - width / 2.0,
        max.x - min.x + width,
        max.y - min.y + width,
    )
}

/// A generated level layout. Immutable once built, except for the live
/// battery list which the level mutates as batteries are collected.
#[derive(Clone, Debug, PartialEq)]
pub struct Dungeon {
    pub width: f32,
    pub height: f32,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    /// Every collidable rectangle: map boundary, solid blocks, room obstacles
    pub walls: Vec<Rect>,
    pub batteries: Vec<Rect>,
    /// Validated enemy spawn points across all rooms
    pub spawn_points: Vec<Vec2>,
    pub start_position: Vec2,
    pub exit: Rect,
}

impl Dungeon {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn start_room(&self) -> Option<usize> {
        self.rooms.iter().position(|r| r.room_type == RoomType::Start)
    }

    pub fn exit_room(&self) -> Option<usize> {
        self.rooms.iter().position(|r| r.room_type == RoomType::Exit)
    }

    /// Index of the room containing a point
    pub fn room_at(&self, p: Vec2) -> Option<usize> {
        self.rooms.iter().position(|r| r.contains_point(p))
    }

    /// Check if a point lies inside the start or exit room
    pub fn in_special_room(&self, p: Vec2) -> bool {
        self.rooms
            .iter()
            .any(|r| r.room_type.is_special() && r.contains_point(p))
    }

    /// Room adjacency through doors sharing a corridor
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        room_adjacency(&self.rooms, &self.corridors)
    }

    /// Rooms reachable from `from` through the door/corridor graph
    pub fn reachable_from(&self, from: usize) -> Vec<bool> {
        reachable_rooms(&self.adjacency(), from)
    }

    /// Rooms one corridor away from `room`: any room with a door touching a
    /// corridor section that also touches one of `room`'s doors.
    pub fn neighbors_of(&self, room: usize) -> Vec<usize> {
        let Some(current) = self.rooms.get(room) else {
            return Vec::new();
        };
        let mut near = Vec::new();
        for corridor in &self.corridors {
            if !current.doors.iter().any(|d| corridor.touches(&d.rect)) {
                continue;
            }
            for idx in self.rooms_on_corridor(corridor) {
                if idx != room && !near.contains(&idx) {
                    near.push(idx);
                }
            }
        }
        near
    }

    /// Rooms with a door onto any corridor containing the point
    pub fn rooms_near_corridor_point(&self, p: Vec2) -> Vec<usize> {
        let mut near = Vec::new();
        for corridor in self.corridors.iter().filter(|c| c.contains_point(p)) {
            for idx in self.rooms_on_corridor(corridor) {
                if !near.contains(&idx) {
                    near.push(idx);
                }
            }
        }
        near
    }

    fn rooms_on_corridor<'a>(&'a self, corridor: &'a Corridor) -> impl Iterator<Item = usize> + 'a {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.doors.iter().any(|d| corridor.touches(&d.rect)))
            .map(|(i, _)| i)
    }
}

/// Build the adjacency lists: two rooms are adjacent when each has a door
/// touching the same corridor.
pub fn room_adjacency(rooms: &[Room], corridors: &[Corridor]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); rooms.len()];
    for corridor in corridors {
        let attached: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.doors.iter().any(|d| corridor.touches(&d.rect)))
            .map(|(i, _)| i)
            .collect();
        for &a in &attached {
            for &b in &attached {
                if a != b && !adjacency[a].contains(&b) {
                    adjacency[a].push(b);
                }
            }
        }
    }
    adjacency
}

/// Breadth-first search over an adjacency list
pub fn reachable_rooms(adjacency: &[Vec<usize>], from: usize) -> Vec<bool> {
    let mut reached = vec![false; adjacency.len()];
    if from >= adjacency.len() {
        return reached;
    }

    let mut queue = VecDeque::from([from]);
    reached[from] = true;
    while let Some(room) = queue.pop_front() {
        for &next in &adjacency[room] {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }
    reached
}

/// One solid fill block
#[derive(Clone, Copy, Debug, PartialEq)]
struct Block {
    rect: Rect,
    /// Border blocks are never carved
    border: bool,
}

pub struct DungeonGenerator<'a> {
    config: &'a GameConfig,
    width: f32,
    height: f32,
    blocks: Vec<Block>,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            width: config.dungeon.map_width,
            height: config.dungeon.map_height,
            blocks: Vec::new(),
            rooms: Vec::new(),
            corridors: Vec::new(),
        }
    }

    /// Generate a complete dungeon
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> Dungeon {
        puffin::profile_function!();

        let mut gen = DungeonGenerator::new(config);
        gen.fill_blocks(rng);
        gen.place_rooms(rng);
        for i in 0..gen.rooms.len() {
            gen.carve_room(i);
        }
        gen.connect_rooms(rng);
        gen.repair_connectivity(rng);

        let mut walls = gen.collect_walls();
        let batteries: Vec<Rect> = gen.rooms.iter().flat_map(|r| r.batteries.iter().copied()).collect();
        let spawn_points = gen.select_spawn_points(&walls, rng);
        let start_position = gen.start_position();
        let exit = gen.place_exit(&mut walls);

        info!(
            rooms = gen.rooms.len(),
            corridors = gen.corridors.len(),
            walls = walls.len(),
            batteries = batteries.len(),
            spawn_points = spawn_points.len(),
            "dungeon generated"
        );

        Dungeon {
            width: gen.width,
            height: gen.height,
            rooms: gen.rooms,
            corridors: gen.corridors,
            walls,
            batteries,
            spawn_points,
            start_position,
            exit,
        }
    }

    /// Tile the map with blocks. The outer ring is always solid, interior
    /// blocks are solid with the configured chance.
    fn fill_blocks(&mut self, rng: &mut impl Rng) {
        let size = self.config.dungeon.block_size;
        let cols = (self.width / size).ceil() as i32;
        let rows = (self.height / size).ceil() as i32;

        self.blocks.clear();
        for by in 0..rows {
            for bx in 0..cols {
                let border = bx == 0 || by == 0 || bx == cols - 1 || by == rows - 1;
                if border || rng.gen_bool(self.config.dungeon.wall_fill_chance) {
                    self.blocks.push(Block {
                        rect: Rect::new(bx as f32 * size, by as f32 * size, size, size),
                        border,
                    });
                }
            }
        }
    }

    /// Lay rooms out on the grid: start in the top-left cell, exit in the
    /// bottom-right, the rest present by chance.
    fn place_rooms(&mut self, rng: &mut impl Rng) {
        puffin::profile_scope!("place_rooms");

        let grid = self.config.dungeon.grid_size;
        let cell_w = self.width / grid as f32;
        let cell_h = self.height / grid as f32;

        for row in 0..grid {
            for col in 0..grid {
                let room_type = if row == 0 && col == 0 {
                    RoomType::Start
                } else if row == grid - 1 && col == grid - 1 {
                    RoomType::Exit
                } else if !rng.gen_bool(self.config.dungeon.room_presence_chance) {
                    continue;
                } else if rng.gen_bool(self.config.dungeon.difficult_room_chance) {
                    RoomType::Difficult
                } else {
                    RoomType::Normal
                };

                let (lo, hi) = if room_type.is_special() {
                    SPECIAL_ROOM_SIZE_FRACTION
                } else {
                    ROOM_SIZE_FRACTION
                };
                let width = (cell_w * rng.gen_range(lo..=hi)).floor();
                let height = (cell_h * rng.gen_range(lo..=hi)).floor();
                // Centered in the cell, so rooms sharing a row or column
                // line up and their corridors run straight.
                let x = col as f32 * cell_w + (cell_w - width) / 2.0;
                let y = row as f32 * cell_h + (cell_h - height) / 2.0;

                let room = self.furnish_room(Room::new(x, y, width, height, room_type), rng);
                self.rooms.push(room);
            }
        }
    }

    fn furnish_room(&self, mut room: Room, rng: &mut impl Rng) -> Room {
        let tuning = &self.config.rooms;
        room.generate_obstacles(tuning, rng);
        let batteries = match room.room_type {
            RoomType::Start => START_ROOM_BATTERIES,
            RoomType::Difficult => DIFFICULT_ROOM_BATTERIES,
            RoomType::Normal => usize::from(rng.gen_bool(tuning.normal_battery_chance)),
            RoomType::Exit => 0,
        };
        if batteries > 0 {
            room.add_battery(batteries, rng);
        }
        room
    }

    /// Remove every block lying inside the (slightly grown) room rect
    fn carve_room(&mut self, index: usize) {
        let area = self.rooms[index].rect.grow(ROOM_CARVE_MARGIN);
        self.blocks.retain(|b| b.border || !area.contains_rect(&b.rect));
    }

    /// Remove blocks touching either corridor section or lying inside its bounds
    fn carve_corridor(&mut self, corridor: &Corridor) {
        self.blocks
            .retain(|b| b.border || !(corridor.touches(&b.rect) || corridor.bounds.contains_rect(&b.rect)));
    }

    /// Join rooms with a spanning tree grown from the start room, then add a
    /// few random extra corridors so the layout has loops.
    fn connect_rooms(&mut self, rng: &mut impl Rng) {
        puffin::profile_scope!("connect_rooms");

        let n = self.rooms.len();
        if n < 2 {
            return;
        }

        let root = self.start_index().unwrap_or(0);
        let mut connected = vec![false; n];
        connected[root] = true;

        for _ in 1..n {
            let mut best: Option<(usize, usize, f32)> = None;
            for from in (0..n).filter(|&i| connected[i]) {
                for to in (0..n).filter(|&i| !connected[i]) {
                    let distance = self.rooms[from].center().distance(self.rooms[to].center());
                    if best.map_or(true, |(_, _, d)| distance < d) {
                        best = Some((from, to, distance));
                    }
                }
            }
            let Some((from, to, _)) = best else {
                break;
            };
            self.create_corridor(from, to, rng);
            connected[to] = true;
        }

        for _ in 0..self.config.dungeon.extra_corridors {
            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n - 1);
            if b >= a {
                b += 1;
            }
            self.create_corridor(a, b, rng);
        }
    }

    /// Build, carve and register an L corridor between two rooms, adding a
    /// door on each room where the corridor crosses its wall.
    fn create_corridor(&mut self, a: usize, b: usize, rng: &mut impl Rng) -> Corridor {
        let start = self.rooms[a].center();
        let end = self.rooms[b].center();
        let horizontal_first = rng.gen_bool(0.5);
        let corridor = Corridor::between(start, end, self.config.dungeon.corridor_width, horizontal_first, (a, b));
        self.carve_corridor(&corridor);

        let bend = bend_point(start, end, horizontal_first);
        // The leg leaving `a` is the first non-degenerate one, the leg
        // entering `b` the last.
        let first_leg = (start, bend);
        let second_leg = (bend, end);
        let leaving = if is_degenerate(first_leg) { second_leg } else { first_leg };
        let entering = if is_degenerate(second_leg) { first_leg } else { second_leg };

        if let Some((direction, along)) = travel_direction(leaving.0, leaving.1) {
            self.add_corridor_door(a, direction, along, rng);
        }
        if let Some((direction, along)) = travel_direction(entering.0, entering.1) {
            self.add_corridor_door(b, direction.opposite(), along, rng);
        }

        self.corridors.push(corridor);
        corridor
    }

    /// Door centered on the corridor's centerline, clamped clear of corners
    fn add_corridor_door(&mut self, room: usize, direction: Direction, along: f32, rng: &mut impl Rng) {
        let r = &self.rooms[room];
        let (start, end) = if direction.is_horizontal_wall() {
            (r.rect.x, r.rect.right())
        } else {
            (r.rect.y, r.rect.bottom())
        };
        let lo = start + DOOR_CORNER_CLEARANCE;
        let hi = end - DOOR_CORNER_CLEARANCE - DOOR_WIDTH;
        let position = if lo <= hi {
            (along - DOOR_WIDTH / 2.0).clamp(lo, hi)
        } else {
            along - DOOR_WIDTH / 2.0
        };

        // A rejected door overlaps an existing one on the same wall, which
        // then already sits on this corridor.
        if !self.rooms[room].add_door(direction, Some(position), rng) {
            debug!(room, ?direction, "door not added");
        }
    }

    /// Connect every room the start room cannot reach to its nearest reached
    /// room. Each pass grows the reached set, so the pass count is bounded by
    /// the room count.
    fn repair_connectivity(&mut self, rng: &mut impl Rng) {
        puffin::profile_scope!("repair_connectivity");

        let Some(start) = self.start_index() else {
            warn!("no start room, skipping connectivity repair");
            return;
        };

        for _ in 0..self.rooms.len() {
            let reached = reachable_rooms(&room_adjacency(&self.rooms, &self.corridors), start);
            let unreached: Vec<usize> = (0..self.rooms.len()).filter(|&i| !reached[i]).collect();
            if unreached.is_empty() {
                return;
            }

            for room in unreached {
                let center = self.rooms[room].center();
                let nearest = (0..self.rooms.len())
                    .filter(|&i| reached[i])
                    .min_by(|&i, &j| {
                        let di = self.rooms[i].center().distance(center);
                        let dj = self.rooms[j].center().distance(center);
                        di.total_cmp(&dj)
                    });
                if let Some(target) = nearest {
                    debug!(room, target, "connecting unreachable room");
                    self.create_corridor(room, target, rng);
                }
            }
        }

        let reached = reachable_rooms(&room_adjacency(&self.rooms, &self.corridors), start);
        if reached.iter().any(|r| !r) {
            warn!("some rooms remain unreachable after repair");
        }
    }

    /// Flatten boundary strips, remaining blocks and room obstacles
    fn collect_walls(&self) -> Vec<Rect> {
        let (w, h) = (self.width, self.height);
        let mut walls = vec![
            Rect::new(0.0, 0.0, w, WALL_THICKNESS),
            Rect::new(0.0, 0.0, WALL_THICKNESS, h),
            Rect::new(0.0, h - WALL_THICKNESS, w, WALL_THICKNESS),
            Rect::new(w - WALL_THICKNESS, 0.0, WALL_THICKNESS, h),
        ];
        walls.extend(self.blocks.iter().map(|b| b.rect));
        walls.extend(self.rooms.iter().flat_map(|r| r.obstacles.iter().copied()));
        walls
    }

    /// Keep the spawn candidates that are clear of the final walls and of
    /// other rooms' obstacles, then sample a few per room.
    fn select_spawn_points(&mut self, walls: &[Rect], rng: &mut impl Rng) -> Vec<Vec2> {
        puffin::profile_scope!("select_spawn_points");

        let wall_probe = ENEMY_SIZE + SPAWN_WALL_MARGIN * 2.0;
        let obstacle_probe = ENEMY_SIZE + SPAWN_OBSTACLE_MARGIN * 2.0;
        let mut all = Vec::new();

        for i in 0..self.rooms.len() {
            let keep = match self.rooms[i].room_type {
                RoomType::Difficult => DIFFICULT_ROOM_SPAWN_POINTS,
                RoomType::Normal => NORMAL_ROOM_SPAWN_POINTS,
                RoomType::Start | RoomType::Exit => {
                    self.rooms[i].spawn_points.clear();
                    continue;
                }
            };

            let valid: Vec<Vec2> = self.rooms[i]
                .spawn_points
                .iter()
                .copied()
                .filter(|&p| {
                    let probe = Rect::from_center(p, wall_probe, wall_probe);
                    if collides_any(&probe, walls) {
                        return false;
                    }
                    let probe = Rect::from_center(p, obstacle_probe, obstacle_probe);
                    !self
                        .rooms
                        .iter()
                        .enumerate()
                        .any(|(j, other)| j != i && collides_any(&probe, &other.obstacles))
                })
                .collect();

            let chosen: Vec<Vec2> = valid.choose_multiple(rng, keep).copied().collect();
            all.extend(chosen.iter().copied());
            self.rooms[i].spawn_points = chosen;
        }

        all
    }

    fn start_position(&self) -> Vec2 {
        match self.start_index() {
            Some(i) => self.rooms[i].center(),
            None => {
                warn!("no start room, using default start position");
                DEFAULT_START
            }
        }
    }

    /// Put the exit at the exit room's center, nudging it around if that spot
    /// is blocked, and as a last resort clearing the walls around it.
    fn place_exit(&self, walls: &mut Vec<Rect>) -> Rect {
        let Some(room) = self.rooms.iter().find(|r| r.room_type == RoomType::Exit) else {
            warn!("no exit room, using default exit position");
            let center = Vec2::new(self.width - 100.0, self.height - 100.0);
            return Rect::from_center(center, EXIT_SIZE, EXIT_SIZE);
        };
        place_exit_in(room, walls)
    }

    fn start_index(&self) -> Option<usize> {
        self.rooms.iter().position(|r| r.room_type == RoomType::Start)
    }
}

/// Direction of travel along an axis-aligned leg plus the leg's centerline
/// coordinate across that direction. `None` for a zero-length leg.
fn travel_direction(from: Vec2, to: Vec2) -> Option<(Direction, f32)> {
    if is_degenerate((from, to)) {
        return None;
    }
    if (to.x - from.x).abs() >= (to.y - from.y).abs() {
        let direction = if to.x > from.x { Direction::Right } else { Direction::Left };
        Some((direction, from.y))
    } else {
        let direction = if to.y > from.y { Direction::Bottom } else { Direction::Top };
        Some((direction, from.x))
    }
}

/// Exit placement inside a given room. Clears walls (never the map boundary,
/// which occupies the first four slots) when no free spot exists.
fn place_exit_in(room: &Room, walls: &mut Vec<Rect>) -> Rect {
    let center = room.center();
    let exit = Rect::from_center(center, EXIT_SIZE, EXIT_SIZE);
    if !collides_any(&exit, walls) {
        return exit;
    }

    let steps = (EXIT_SEARCH_RANGE / EXIT_SEARCH_STEP) as i32;
    for dy in -steps..=steps {
        for dx in -steps..=steps {
            let offset = Vec2::new(dx as f32, dy as f32) * EXIT_SEARCH_STEP;
            let candidate = exit.translate(offset);
            if room.rect.contains_rect(&candidate) && !collides_any(&candidate, walls) {
                return candidate;
            }
        }
    }

    warn!(x = center.x, y = center.y, "no free exit spot, clearing walls around exit");
    let clear = Rect::from_center(center, EXIT_SIZE * 2.0, EXIT_SIZE * 2.0);
    let mut index = 0;
    walls.retain(|wall| {
        let keep = index < 4 || !wall.intersects(&clear);
        index += 1;
        keep
    });
    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(seed: u64) -> Dungeon {
        DungeonGenerator::generate(&GameConfig::default(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_exactly_one_start_and_exit() {
        for seed in 0..5 {
            let dungeon = generate(seed);
            let starts = dungeon.rooms.iter().filter(|r| r.room_type == RoomType::Start).count();
            let exits = dungeon.rooms.iter().filter(|r| r.room_type == RoomType::Exit).count();
            assert_eq!(starts, 1);
            assert_eq!(exits, 1);
            assert_eq!(dungeon.start_room(), Some(0));
        }
    }

    #[test]
    fn test_start_position_is_start_room_center() {
        let dungeon = generate(11);
        let start = &dungeon.rooms[0];
        assert_eq!(dungeon.start_position, start.center());
        let player = Rect::from_center(dungeon.start_position, PLAYER_SIZE, PLAYER_SIZE);
        assert!(!collides_any(&player, &dungeon.walls));
    }

    #[test]
    fn test_exit_is_unobstructed_and_in_exit_room() {
        for seed in 0..10 {
            let dungeon = generate(seed);
            assert!(!collides_any(&dungeon.exit, &dungeon.walls));
            let exit_room = &dungeon.rooms[dungeon.exit_room().unwrap()];
            assert!(exit_room.rect.contains_point(dungeon.exit.center()));
        }
    }

    #[test]
    fn test_rooms_are_carved_out() {
        let dungeon = generate(5);
        for room in &dungeon.rooms {
            let inner = room.rect.grow(-(BLOCK_SIZE + 1.0));
            for wall in &dungeon.walls[4..] {
                if inner.intersects(wall) {
                    assert!(room.obstacles.contains(wall), "stray block {wall:?} inside {:?}", room.rect);
                }
            }
        }
    }

    #[test]
    fn test_boundary_walls_come_first() {
        let dungeon = generate(2);
        assert_eq!(dungeon.walls[0], Rect::new(0.0, 0.0, MAP_WIDTH, WALL_THICKNESS));
        assert_eq!(dungeon.walls[3], Rect::new(MAP_WIDTH - WALL_THICKNESS, 0.0, WALL_THICKNESS, MAP_HEIGHT));
    }

    #[test]
    fn test_batteries_are_flattened_from_rooms() {
        let dungeon = generate(9);
        let from_rooms: usize = dungeon.rooms.iter().map(|r| r.batteries.len()).sum();
        assert_eq!(dungeon.batteries.len(), from_rooms);
        assert!(dungeon.rooms[0].batteries.len() <= START_ROOM_BATTERIES);
    }

    #[test]
    fn test_spawn_points_are_clear_and_capped() {
        for seed in 0..10 {
            let dungeon = generate(seed);
            let from_rooms: usize = dungeon.rooms.iter().map(|r| r.spawn_points.len()).sum();
            assert_eq!(from_rooms, dungeon.spawn_points.len());
            for room in &dungeon.rooms {
                let cap = match room.room_type {
                    RoomType::Difficult => DIFFICULT_ROOM_SPAWN_POINTS,
                    RoomType::Normal => NORMAL_ROOM_SPAWN_POINTS,
                    _ => 0,
                };
                assert!(room.spawn_points.len() <= cap);
            }
            for p in &dungeon.spawn_points {
                let probe = Rect::from_center(*p, ENEMY_SIZE, ENEMY_SIZE);
                assert!(!collides_any(&probe, &dungeon.walls));
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = generate(1234);
        let b = generate(1234);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.corridors, b.corridors);
        assert_eq!(a, b);
    }

    #[quickcheck]
    fn prop_every_room_reachable_from_start(seed: u64) -> bool {
        let dungeon = generate(seed);
        let start = dungeon.start_room().unwrap();
        dungeon.reachable_from(start).iter().all(|&r| r)
    }

    #[quickcheck]
    fn prop_generation_is_deterministic(seed: u64) -> bool {
        generate(seed) == generate(seed)
    }

    fn solid_generator(config: &GameConfig) -> DungeonGenerator<'_> {
        let mut gen = DungeonGenerator::new(config);
        gen.fill_blocks(&mut StdRng::seed_from_u64(0));
        gen
    }

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.dungeon.map_width = 1400.0;
        config.dungeon.map_height = 1400.0;
        config.dungeon.wall_fill_chance = 1.0;
        config
    }

    #[test]
    fn test_corridor_between_diagonal_rooms_is_carved() {
        let config = small_config();
        let mut gen = solid_generator(&config);
        gen.rooms.push(Room::new(0.0, 0.0, 200.0, 200.0, RoomType::Start));
        gen.rooms.push(Room::new(1000.0, 1000.0, 200.0, 200.0, RoomType::Exit));

        let mut rng = StdRng::seed_from_u64(3);
        let corridor = gen.create_corridor(0, 1, &mut rng);

        for center in [gen.rooms[0].center(), gen.rooms[1].center()] {
            assert!(corridor.bounds.contains_point(center));
        }
        for block in &gen.blocks {
            assert!(block.border || !corridor.bounds.contains_rect(&block.rect));
            assert!(block.border || !corridor.touches(&block.rect));
        }
    }

    #[test]
    fn test_corridor_shape() {
        let c = Corridor::between(Vec2::new(100.0, 100.0), Vec2::new(500.0, 300.0), 80.0, true, (0, 1));
        assert_eq!(c.sections[0], Rect::new(60.0, 60.0, 480.0, 80.0));
        assert_eq!(c.sections[1], Rect::new(460.0, 60.0, 80.0, 280.0));
        assert_eq!(c.bounds, Rect::new(60.0, 60.0, 480.0, 280.0));
        assert!(c.contains_point(Vec2::new(500.0, 100.0)));
        assert!(!c.contains_point(Vec2::new(100.0, 300.0)));
    }

    #[test]
    fn test_corridor_adds_facing_doors() {
        let config = small_config();
        let mut gen = solid_generator(&config);
        gen.rooms.push(Room::new(100.0, 100.0, 400.0, 400.0, RoomType::Start));
        gen.rooms.push(Room::new(800.0, 100.0, 400.0, 400.0, RoomType::Normal));

        gen.create_corridor(0, 1, &mut StdRng::seed_from_u64(1));
        assert_eq!(gen.rooms[0].doors[0].direction, Direction::Right);
        assert_eq!(gen.rooms[1].doors[0].direction, Direction::Left);
        let adjacency = room_adjacency(&gen.rooms, &gen.corridors);
        assert_eq!(adjacency[0], vec![1]);
    }

    #[test]
    fn test_repair_connects_isolated_room() {
        let config = small_config();
        let mut gen = solid_generator(&config);
        gen.rooms.push(Room::new(100.0, 100.0, 400.0, 400.0, RoomType::Start));
        gen.rooms.push(Room::new(800.0, 100.0, 400.0, 400.0, RoomType::Normal));
        gen.rooms.push(Room::new(800.0, 850.0, 400.0, 400.0, RoomType::Exit));
        let mut rng = StdRng::seed_from_u64(8);
        gen.create_corridor(0, 1, &mut rng);

        let before = reachable_rooms(&room_adjacency(&gen.rooms, &gen.corridors), 0);
        assert_eq!(before, vec![true, true, false]);

        gen.repair_connectivity(&mut rng);
        let after = reachable_rooms(&room_adjacency(&gen.rooms, &gen.corridors), 0);
        assert!(after.iter().all(|&r| r));
        assert_eq!(gen.corridors.len(), 2);
        assert_eq!(gen.corridors[1].rooms, (2, 1));
    }

    #[test]
    fn test_exit_nudged_off_blocked_center() {
        let room = Room::new(0.0, 0.0, 400.0, 400.0, RoomType::Exit);
        let center = room.center();
        let mut walls = vec![Rect::from_center(center, 10.0, 10.0)];
        let exit = place_exit_in(&room, &mut walls);
        assert!(!collides_any(&exit, &walls));
        assert_eq!(walls.len(), 1);
        assert!((exit.center() - center).length() <= EXIT_SEARCH_RANGE * 2f32.sqrt() + 1e-3);
    }

    #[test]
    fn test_exit_clears_walls_when_boxed_in() {
        let room = Room::new(0.0, 0.0, 400.0, 400.0, RoomType::Exit);
        let center = room.center();
        let boundary = vec![Rect::new(-10.0, -10.0, 1.0, 1.0); 4];
        let mut walls = boundary.clone();
        walls.push(Rect::from_center(center, 200.0, 200.0));
        walls.push(Rect::new(390.0, 390.0, 5.0, 5.0));

        let exit = place_exit_in(&room, &mut walls);
        assert_eq!(exit, Rect::from_center(center, EXIT_SIZE, EXIT_SIZE));
        assert_eq!(&walls[..4], &boundary[..]);
        assert_eq!(walls.len(), 5);
        assert!(!collides_any(&exit, &walls));
    }

    #[test]
    fn test_neighbors_follow_doors() {
        let config = small_config();
        let mut gen = solid_generator(&config);
        gen.rooms.push(Room::new(100.0, 100.0, 400.0, 400.0, RoomType::Start));
        gen.rooms.push(Room::new(800.0, 100.0, 400.0, 400.0, RoomType::Normal));
        gen.rooms.push(Room::new(800.0, 850.0, 400.0, 400.0, RoomType::Exit));
        let mut rng = StdRng::seed_from_u64(4);
        gen.create_corridor(0, 1, &mut rng);
        gen.create_corridor(1, 2, &mut rng);
        let walls = gen.collect_walls();
        let dungeon = Dungeon {
            width: gen.width,
            height: gen.height,
            rooms: gen.rooms.clone(),
            corridors: gen.corridors.clone(),
            walls,
            batteries: Vec::new(),
            spawn_points: Vec::new(),
            start_position: gen.rooms[0].center(),
            exit: Rect::default(),
        };

        assert_eq!(dungeon.neighbors_of(0), vec![1]);
        let mut middle = dungeon.neighbors_of(1);
        middle.sort();
        assert_eq!(middle, vec![0, 2]);
        assert_eq!(dungeon.room_at(Vec2::new(300.0, 300.0)), Some(0));
        assert_eq!(dungeon.room_at(Vec2::new(650.0, 300.0)), None);
        let mut near = dungeon.rooms_near_corridor_point(Vec2::new(650.0, 300.0));
        near.sort();
        assert_eq!(near, vec![0, 1]);
    }
}
