//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Values that designers are expected to iterate on are mirrored in
//! [`crate::config::GameConfig`]; the constants here are their defaults.

mod camera;
mod dungeon;
mod enemies;
mod gameplay;
mod geometry;
mod light;

pub use camera::*;
pub use dungeon::*;
pub use enemies::*;
pub use gameplay::*;
pub use geometry::*;
pub use light::*;
