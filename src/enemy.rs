//! Enemy state machine and light reactions.
//!
//! Every enemy shares one [`EnemyCore`] (position, timers, state). What
//! differs between kinds is how they react to the flashlight, which lives
//! behind [`EnemyBehavior`]: a Shadow fades out for good, a Ghost is slowed
//! down for a while.

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{angle_between, has_line_of_sight, move_per_axis, Rect};
use crate::player::Player;
use crate::render::Color;

const CARDINALS: [Vec2; 4] = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    Idle,
    Chase,
    /// Stunned by the flashlight (Ghost)
    AffectedByLight,
    /// Dissolving after a light hit (Shadow); ends in invisibility
    Fading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Shadow,
    Ghost,
}

impl EnemyKind {
    pub fn behavior(self) -> &'static dyn EnemyBehavior {
        match self {
            EnemyKind::Shadow => &Shadow,
            EnemyKind::Ghost => &Ghost,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Shadow => "shadow",
            EnemyKind::Ghost => "ghost",
        }
    }
}

/// Per-kind fixed stats
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub detection_radius: f32,
    pub chase_limit: f32,
    pub color: Color,
}

/// Outcome of a light hit for one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightResponse {
    /// The hit consumed the tick. `entered` is set when the state changed.
    Handled { entered: bool },
    /// Carry on with regular state handling
    Ignored,
}

/// Kind-specific reactions plugged into the shared state machine
pub trait EnemyBehavior {
    fn stats(&self) -> EnemyStats;

    fn on_light_hit(&self, core: &mut EnemyCore) -> LightResponse;

    /// The light effect timer ran out
    fn on_effect_expired(&self, core: &mut EnemyCore) {
        core.state = EnemyState::Idle;
    }
}

pub struct Shadow;

impl EnemyBehavior for Shadow {
    fn stats(&self) -> EnemyStats {
        EnemyStats {
            speed: SHADOW_SPEED,
            detection_radius: SHADOW_DETECTION_RADIUS,
            chase_limit: SHADOW_CHASE_LIMIT,
            color: SHADOW_COLOR,
        }
    }

    fn on_light_hit(&self, core: &mut EnemyCore) -> LightResponse {
        // Fading keeps counting down while lit
        if core.state == EnemyState::Fading {
            return LightResponse::Ignored;
        }
        core.state = EnemyState::Fading;
        core.effect_timer = SHADOW_FADE_TIME;
        LightResponse::Handled { entered: true }
    }
}

pub struct Ghost;

impl EnemyBehavior for Ghost {
    fn stats(&self) -> EnemyStats {
        EnemyStats {
            speed: GHOST_SPEED,
            detection_radius: GHOST_DETECTION_RADIUS,
            chase_limit: GHOST_CHASE_LIMIT,
            color: GHOST_COLOR,
        }
    }

    fn on_light_hit(&self, core: &mut EnemyCore) -> LightResponse {
        let entered = core.state != EnemyState::AffectedByLight;
        core.state = EnemyState::AffectedByLight;
        core.effect_timer = GHOST_STUN_TIME;
        core.speed = GHOST_LIGHT_SPEED;
        core.color = GHOST_STUNNED_COLOR;
        LightResponse::Handled { entered }
    }

    fn on_effect_expired(&self, core: &mut EnemyCore) {
        core.state = EnemyState::Idle;
        core.speed = core.base_speed;
        core.color = core.base_color;
    }
}

/// State shared by every enemy kind
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyCore {
    pub rect: Rect,
    pub speed: f32,
    pub base_speed: f32,
    pub color: Color,
    pub base_color: Color,
    pub state: EnemyState,
    /// Idle wander direction, one of the four cardinals
    pub direction: Vec2,
    pub idle_timer: u32,
    pub idle_duration: u32,
    /// Countdown for AffectedByLight / Fading
    pub effect_timer: u32,
    pub visible: bool,
    pub detection_radius: f32,
    pub chase_limit: f32,
}

impl EnemyCore {
    pub fn new(kind: EnemyKind, center: Vec2, rng: &mut impl Rng) -> Self {
        let stats = kind.behavior().stats();
        Self {
            rect: Rect::from_center(center, ENEMY_SIZE, ENEMY_SIZE),
            speed: stats.speed,
            base_speed: stats.speed,
            color: stats.color,
            base_color: stats.color,
            state: EnemyState::Idle,
            direction: random_cardinal(rng),
            idle_timer: 0,
            idle_duration: rng.gen_range(IDLE_DURATION.0..=IDLE_DURATION.1),
            effect_timer: 0,
            visible: true,
            detection_radius: stats.detection_radius,
            chase_limit: stats.chase_limit,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Color to draw with; a fading enemy grows transparent
    pub fn draw_color(&self) -> Color {
        if self.state == EnemyState::Fading {
            let alpha = self.effect_timer as f32 / SHADOW_FADE_TIME as f32;
            self.color.with_alpha((alpha.clamp(0.0, 1.0) * 255.0) as u8)
        } else {
            self.color
        }
    }
}

fn random_cardinal(rng: &mut impl Rng) -> Vec2 {
    CARDINALS[rng.gen_range(0..CARDINALS.len())]
}

/// Check if the enemy sits inside the flashlight cone with nothing in between.
/// Both the radius and the half-angle bounds are inclusive.
pub fn is_in_light(core: &EnemyCore, player: &Player, walls: &[Rect]) -> bool {
    let light = &player.flashlight;
    let origin = player.center();
    let target = core.center();
    let offset = target - origin;
    let distance = offset.length();

    if distance > light.current_radius() {
        return false;
    }
    if distance > 0.0 {
        let bearing = offset.y.atan2(offset.x);
        if angle_between(bearing, light.angle) > light.half_angle() {
            return false;
        }
    }

    has_line_of_sight(origin, target, walls)
}

/// Advance one enemy by one tick.
pub fn update_enemy(
    core: &mut EnemyCore,
    kind: EnemyKind,
    player: &Player,
    walls: &[Rect],
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    let behavior = kind.behavior();

    if core.visible && player.flashlight.on && is_in_light(core, player, walls) {
        if let LightResponse::Handled { entered } = behavior.on_light_hit(core) {
            if entered {
                debug!(kind = kind.name(), state = ?core.state, "enemy hit by light");
                events.push(GameEvent::LightHitEnemy {
                    kind,
                    position: core.center(),
                });
            }
            return;
        }
    }

    if !core.visible {
        return;
    }

    match core.state {
        EnemyState::AffectedByLight => {
            core.effect_timer = core.effect_timer.saturating_sub(1);
            if core.effect_timer == 0 {
                behavior.on_effect_expired(core);
            } else {
                // Stunned enemies still creep toward the player at reduced speed
                let toward = (player.center() - core.center()).normalize_or_zero();
                move_per_axis(&mut core.rect, toward * core.speed, walls);
            }
        }
        EnemyState::Fading => {
            core.effect_timer = core.effect_timer.saturating_sub(1);
            if core.effect_timer == 0 {
                core.visible = false;
            }
        }
        EnemyState::Idle | EnemyState::Chase => {
            let distance = core.center().distance(player.center());
            if distance < core.detection_radius {
                if core.state != EnemyState::Chase {
                    core.state = EnemyState::Chase;
                    events.push(GameEvent::EnemyDetected {
                        kind,
                        position: core.center(),
                    });
                }
            } else if core.state == EnemyState::Chase && distance > core.chase_limit {
                core.state = EnemyState::Idle;
            }

            if core.state == EnemyState::Chase {
                chase(core, player.center(), walls);
            } else {
                wander(core, walls, rng);
            }
        }
    }
}

fn chase(core: &mut EnemyCore, target: Vec2, walls: &[Rect]) {
    let toward = (target - core.center()).normalize_or_zero();
    move_per_axis(&mut core.rect, toward * core.speed, walls);
}

/// Idle wander at half speed, bouncing off walls axis by axis
fn wander(core: &mut EnemyCore, walls: &[Rect], rng: &mut impl Rng) {
    core.idle_timer += 1;
    if core.idle_timer >= core.idle_duration {
        core.direction = random_cardinal(rng);
        core.idle_timer = 0;
        core.idle_duration = rng.gen_range(IDLE_DURATION.0..=IDLE_DURATION.1);
    }

    let (blocked_x, blocked_y) = move_per_axis(&mut core.rect, core.direction * (core.speed / 2.0), walls);
    if blocked_x {
        core.direction.x = -core.direction.x;
    }
    if blocked_y {
        core.direction.y = -core.direction.y;
    }
}
