//! Owns every live enemy and decides where new ones appear.
//!
//! Enemies are entities in a private `hecs::World` carrying an
//! [`EnemyCore`] and an [`EnemyKind`]. Each tick the manager advances them,
//! reports a catch, prunes faded shadows and runs the two respawn timers.

use std::f32::consts::TAU;

use glam::Vec2;
use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::config::SpawnConfig;
use crate::constants::*;
use crate::dungeon_gen::Dungeon;
use crate::enemy::{update_enemy, EnemyCore, EnemyKind};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{collides_any, Rect};
use crate::level::Outcome;
use crate::player::Player;
use crate::render::Canvas;
use crate::room::RoomType;

pub struct EnemyManager {
    world: World,
    config: SpawnConfig,
    shadow_spawn_timer: u32,
    ghost_spawn_timer: u32,
    /// Room containing the player's center, if any
    current_room: Option<usize>,
    /// Rooms one corridor away from the player
    near_rooms: Vec<usize>,
    initialized: bool,
}

impl EnemyManager {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            world: World::new(),
            config: config.clone(),
            shadow_spawn_timer: 0,
            ghost_spawn_timer: 0,
            current_room: None,
            near_rooms: Vec::new(),
            initialized: false,
        }
    }

    /// Advance every enemy by one tick.
    ///
    /// The first call for a level performs the initial spawn. Returns
    /// [`Outcome::GameOver`] as soon as a visible enemy touches the player.
    pub fn update(
        &mut self,
        player: &Player,
        dungeon: &Dungeon,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> Outcome {
        puffin::profile_function!();

        if !self.initialized {
            self.spawn_initial(dungeon, player, rng);
        }

        self.track_player_room(player, dungeon);

        for (_, (core, kind)) in self.world.query_mut::<(&mut EnemyCore, &EnemyKind)>() {
            update_enemy(core, *kind, player, &dungeon.walls, rng, events);
        }

        for (_, (core, kind)) in self.world.query::<(&EnemyCore, &EnemyKind)>().iter() {
            if core.visible && core.rect.intersects(&player.rect) {
                info!(kind = kind.name(), "player caught");
                events.push(GameEvent::PlayerCaught { kind: *kind });
                return Outcome::GameOver;
            }
        }

        self.prune_faded();
        self.manage_spawning(player, dungeon, rng);
        Outcome::Continue
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera) {
        for (_, core) in self.world.query::<&EnemyCore>().iter() {
            if core.visible && camera.is_visible(&core.rect) {
                canvas.fill_rect(camera.apply_rect(&core.rect), core.draw_color());
            }
        }
    }

    /// Drop every enemy and start over; the next update spawns a fresh set
    pub fn reset(&mut self) {
        self.world.clear();
        self.shadow_spawn_timer = 0;
        self.ghost_spawn_timer = 0;
        self.current_room = None;
        self.near_rooms.clear();
        self.initialized = false;
    }

    pub fn spawn(&mut self, kind: EnemyKind, center: Vec2, rng: &mut impl Rng) -> Entity {
        debug!(kind = kind.name(), x = center.x, y = center.y, "enemy spawned");
        self.world.spawn((EnemyCore::new(kind, center, rng), kind))
    }

    /// Snapshot of all live enemies
    pub fn enemies(&self) -> Vec<(EnemyKind, EnemyCore)> {
        self.world
            .query::<(&EnemyCore, &EnemyKind)>()
            .iter()
            .map(|(_, (core, kind))| (*kind, core.clone()))
            .collect()
    }

    pub fn get(&self, entity: Entity) -> Option<EnemyCore> {
        self.world.get::<&EnemyCore>(entity).ok().map(|core| (*core).clone())
    }

    pub fn count(&self, kind: EnemyKind) -> usize {
        self.world
            .query::<&EnemyKind>()
            .iter()
            .filter(|(_, k)| **k == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn current_room(&self) -> Option<usize> {
        self.current_room
    }

    pub fn near_rooms(&self) -> &[usize] {
        &self.near_rooms
    }

    /// Skip the initial spawn on the next update
    #[cfg(test)]
    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Populate the level: shadows then ghosts on difficult room spawn
    /// points, alternating kinds in normal rooms, then distance-based top-up
    /// until the floor is reached.
    pub fn spawn_initial(&mut self, dungeon: &Dungeon, player: &Player, rng: &mut impl Rng) {
        puffin::profile_function!();
        self.initialized = true;

        for room in &dungeon.rooms {
            match room.room_type {
                RoomType::Difficult => {
                    let points = &room.spawn_points;
                    for &p in points.iter().take(DIFFICULT_ROOM_SHADOWS) {
                        self.spawn(EnemyKind::Shadow, p, rng);
                    }
                    for &p in points.iter().skip(DIFFICULT_ROOM_SHADOWS).take(DIFFICULT_ROOM_GHOSTS) {
                        self.spawn(EnemyKind::Ghost, p, rng);
                    }
                }
                RoomType::Normal => {
                    for (i, &p) in room.spawn_points.iter().take(NORMAL_ROOM_ENEMIES).enumerate() {
                        self.spawn(alternating_kind(i), p, rng);
                    }
                }
                RoomType::Start | RoomType::Exit => {}
            }
        }

        let mut spawned = self.len();
        while spawned < self.config.initial_enemy_floor {
            let Some(p) = distance_spawn_point(player, dungeon, &self.config, rng) else {
                warn!(spawned, "initial top-up found no free spot");
                break;
            };
            self.spawn(alternating_kind(spawned), p, rng);
            spawned += 1;
        }

        info!(
            shadows = self.count(EnemyKind::Shadow),
            ghosts = self.count(EnemyKind::Ghost),
            "initial enemies spawned"
        );
    }

    fn track_player_room(&mut self, player: &Player, dungeon: &Dungeon) {
        let center = player.center();
        self.current_room = dungeon.room_at(center);
        self.near_rooms = match self.current_room {
            Some(room) => dungeon.neighbors_of(room),
            None => dungeon.rooms_near_corridor_point(center),
        };
    }

    /// Remove shadows that have fully faded out
    fn prune_faded(&mut self) {
        let spent: Vec<Entity> = self
            .world
            .query::<(&EnemyCore, &EnemyKind)>()
            .iter()
            .filter(|(_, (core, kind))| **kind == EnemyKind::Shadow && !core.visible)
            .map(|(entity, _)| entity)
            .collect();

        for entity in spent {
            let _ = self.world.despawn(entity);
        }
    }

    /// Each kind's timer only runs while that kind is below its cap
    fn manage_spawning(&mut self, player: &Player, dungeon: &Dungeon, rng: &mut impl Rng) {
        if self.count(EnemyKind::Shadow) < self.config.max_shadows {
            self.shadow_spawn_timer += 1;
            if self.shadow_spawn_timer >= self.config.shadow_spawn_interval {
                self.shadow_spawn_timer = 0;
                self.smart_spawn(EnemyKind::Shadow, player, dungeon, rng);
            }
        }

        if self.count(EnemyKind::Ghost) < self.config.max_ghosts {
            self.ghost_spawn_timer += 1;
            if self.ghost_spawn_timer >= self.config.ghost_spawn_interval {
                self.ghost_spawn_timer = 0;
                self.smart_spawn(EnemyKind::Ghost, player, dungeon, rng);
            }
        }
    }

    /// Place one enemy, trying progressively less selective strategies
    pub fn smart_spawn(
        &mut self,
        kind: EnemyKind,
        player: &Player,
        dungeon: &Dungeon,
        rng: &mut impl Rng,
    ) -> Option<Entity> {
        puffin::profile_function!();

        let position = self
            .near_room_point(player, dungeon, rng)
            .or_else(|| self.known_spawn_point(player, dungeon, rng))
            .or_else(|| distance_spawn_point(player, dungeon, &self.config, rng))
            .or_else(|| room_spawn_point(player, dungeon, rng))
            .or_else(|| map_spawn_point(player, dungeon, rng));

        match position {
            Some(p) => Some(self.spawn(kind, p, rng)),
            None => {
                warn!(kind = kind.name(), "no spawn position found, dropping spawn");
                None
            }
        }
    }

    /// A spawn point in a room next to the player's, far enough away
    fn near_room_point(&self, player: &Player, dungeon: &Dungeon, rng: &mut impl Rng) -> Option<Vec2> {
        let origin = player.center();
        let candidates: Vec<Vec2> = self
            .near_rooms
            .iter()
            .filter_map(|&i| dungeon.rooms.get(i))
            .flat_map(|room| room.spawn_points.iter().copied())
            .filter(|p| p.distance(origin) >= self.config.min_spawn_distance)
            .collect();
        candidates.choose(rng).copied()
    }

    /// Any validated spawn point far enough away and outside the player's room
    fn known_spawn_point(&self, player: &Player, dungeon: &Dungeon, rng: &mut impl Rng) -> Option<Vec2> {
        let origin = player.center();
        let current = self.current_room.and_then(|i| dungeon.rooms.get(i));
        let candidates: Vec<Vec2> = dungeon
            .spawn_points
            .iter()
            .copied()
            .filter(|p| p.distance(origin) >= self.config.min_spawn_distance)
            .filter(|p| current.map_or(true, |room| !room.contains_point(*p)))
            .collect();
        candidates.choose(rng).copied()
    }
}

fn alternating_kind(index: usize) -> EnemyKind {
    if index % 2 == 0 {
        EnemyKind::Shadow
    } else {
        EnemyKind::Ghost
    }
}

/// Enemy-sized probe with a safety margin on every side
fn spawn_probe(center: Vec2) -> Rect {
    let side = ENEMY_SIZE + SPAWN_SAFETY_MARGIN * 2.0;
    Rect::from_center(center, side, side)
}

/// Free of walls, inside the map, away from the player and outside the
/// start and exit rooms
fn is_open_spot(p: Vec2, player: &Player, dungeon: &Dungeon) -> bool {
    let probe = spawn_probe(p);
    dungeon.bounds().contains_rect(&probe)
        && !dungeon.in_special_room(p)
        && !probe.intersects(&player.rect)
        && !collides_any(&probe, &dungeon.walls)
}

/// Random point at a distance in `[min_spawn_distance, max_spawn_distance]`
/// from the player
pub fn distance_spawn_point(
    player: &Player,
    dungeon: &Dungeon,
    config: &SpawnConfig,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let origin = player.center();
    for _ in 0..DISTANCE_SPAWN_ATTEMPTS {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(config.min_spawn_distance..=config.max_spawn_distance);
        let p = origin + Vec2::from_angle(angle) * distance;
        if is_open_spot(p, player, dungeon) {
            return Some(p);
        }
    }
    None
}

/// Random open point inside a normal or difficult room
fn room_spawn_point(player: &Player, dungeon: &Dungeon, rng: &mut impl Rng) -> Option<Vec2> {
    let rooms: Vec<&Rect> = dungeon
        .rooms
        .iter()
        .filter(|r| !r.room_type.is_special())
        .map(|r| &r.rect)
        .collect();
    if rooms.is_empty() {
        return None;
    }

    let padding = WALL_THICKNESS + ENEMY_SIZE;
    for _ in 0..ROOM_SPAWN_ATTEMPTS {
        let Some(rect) = rooms.choose(rng) else {
            return None;
        };
        let area = rect.grow(-padding);
        if area.width <= 0.0 || area.height <= 0.0 {
            continue;
        }
        let p = Vec2::new(
            rng.gen_range(area.x..=area.right()),
            rng.gen_range(area.y..=area.bottom()),
        );
        if is_open_spot(p, player, dungeon) {
            return Some(p);
        }
    }
    None
}

/// Random open point anywhere on the map
fn map_spawn_point(player: &Player, dungeon: &Dungeon, rng: &mut impl Rng) -> Option<Vec2> {
    let margin = WALL_THICKNESS + ENEMY_SIZE;
    if dungeon.width <= margin * 2.0 || dungeon.height <= margin * 2.0 {
        return None;
    }
    for _ in 0..MAP_SPAWN_ATTEMPTS {
        let p = Vec2::new(
            rng.gen_range(margin..=dungeon.width - margin),
            rng.gen_range(margin..=dungeon.height - margin),
        );
        if is_open_spot(p, player, dungeon) {
            return Some(p);
        }
    }
    None
}
