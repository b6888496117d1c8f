//! Game event system for decoupled communication between systems.
//!
//! The simulation pushes events while it updates; the session drains them at
//! the end of the tick and forwards them to whatever wants to react (sound,
//! logging, UI).

use glam::Vec2;

use crate::enemy::EnemyKind;

/// Game events that systems can emit and subscribe to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The flashlight started affecting an enemy
    LightHitEnemy { kind: EnemyKind, position: Vec2 },
    /// An enemy noticed the player and started chasing
    EnemyDetected { kind: EnemyKind, position: Vec2 },
    /// The player picked up a battery
    BatteryPickup { position: Vec2, battery: f32 },
    /// The player reached the exit
    LevelComplete,
    /// A visible enemy touched the player
    PlayerCaught { kind: EnemyKind },
}

impl GameEvent {
    /// Symbolic sound played for this event
    pub fn sound_name(&self) -> &'static str {
        match self {
            GameEvent::LightHitEnemy { .. } => "light_hit_enemy",
            GameEvent::EnemyDetected { .. } => "enemy_detect",
            GameEvent::BatteryPickup { .. } => "battery_pickup",
            GameEvent::LevelComplete => "level_complete",
            GameEvent::PlayerCaught { .. } => "player_damage",
        }
    }
}

/// Simple event queue - events are pushed during update, processed at end of tick
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Audio backend. Receives symbolic sound names, never raw assets.
pub trait SoundSink {
    fn play(&mut self, name: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_names() {
        let hit = GameEvent::LightHitEnemy {
            kind: EnemyKind::Ghost,
            position: Vec2::ZERO,
        };
        assert_eq!(hit.sound_name(), "light_hit_enemy");
        assert_eq!(GameEvent::LevelComplete.sound_name(), "level_complete");
        assert_eq!(
            GameEvent::PlayerCaught { kind: EnemyKind::Shadow }.sound_name(),
            "player_damage"
        );
    }

    #[test]
    fn test_drain_empties_queue_in_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::LevelComplete);
        queue.push(GameEvent::BatteryPickup {
            position: Vec2::ONE,
            battery: 50.0,
        });
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0], GameEvent::LevelComplete);
        assert!(matches!(drained[1], GameEvent::BatteryPickup { .. }));
        assert!(queue.is_empty());
    }
}
