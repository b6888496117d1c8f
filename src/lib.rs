//! Procedural dungeons and light-reactive enemy AI for a top-down flashlight
//! survival game.
//!
//! The crate is a headless core: it generates levels, simulates the player,
//! the flashlight and the enemies at a fixed tick, and describes frames
//! through the [`render::Canvas`] trait. Windowing, audio playback and input
//! devices belong to the application that embeds it.

pub mod camera;
pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod enemy;
pub mod enemy_manager;
pub mod events;
pub mod game;
pub mod geometry;
pub mod level;
pub mod player;
pub mod render;
pub mod room;

pub use config::GameConfig;
pub use game::{GameSession, SessionInput, SessionState};
pub use level::{Level, Outcome};
