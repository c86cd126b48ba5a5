//! Tile Quest - gameplay simulation core for a tile-based action platformer
//!
//! Core modules:
//! - `sim`: Per-tick entity simulation (player, monsters, projectiles, tile effects)
//! - `highscores`: Sorted score table and name entry
//! - `settings`: Session configuration
//! - `hud`: Pure helpers for presenting health and time
//!
//! World coordinates are pixels with the y axis pointing down, the way the
//! tilemap collaborator lays out its layers.

pub mod error;
pub mod highscores;
pub mod hud;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::{HighScores, NameEntry};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of a map tile in pixels
    pub const TILE_SIZE: f32 = 16.0;

    /// Default downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 725.0;

    /// Player movement
    pub const PLAYER_MAX_VELOCITY_X: f32 = 7.0 * TILE_SIZE;
    pub const PLAYER_MAX_VELOCITY_Y: f32 = 400.0;
    pub const PLAYER_DRAG_X: f32 = 1000.0;
    pub const PLAYER_ACCELERATION_WALKING: f32 = 250.0;
    pub const PLAYER_ACCELERATION_AIRBORNE: f32 = 200.0;
    pub const PLAYER_ACCELERATION_CLIMBING_OR_SWIMMING: f32 = 7.0 * TILE_SIZE;
    pub const PLAYER_JUMP_VELOCITY: f32 = PLAYER_MAX_VELOCITY_Y;
    pub const PLAYER_CLIMB_OR_SWIM_VELOCITY: f32 = 150.0;

    /// Player health bounds
    pub const PLAYER_MAX_HEALTH: i32 = 10;
    /// Health delta applied when the player falls out of the map
    pub const INSTANT_DEATH_DELTA: i32 = -16;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 10.0 * TILE_SIZE;
    pub const PROJECTILE_MAX_DISTANCE: f32 = 9.0 * TILE_SIZE;

    /// Timings (milliseconds)
    pub const FIRE_INTERVAL_MS: f64 = 250.0;
    pub const PROJECTILE_SPAWN_MS: f64 = 100.0;
    pub const PROJECTILE_FADE_MS: f64 = 100.0;
    pub const HEAL_INTERVAL_MS: f64 = 500.0;
    pub const MELEE_FLOURISH_MS: f64 = 250.0;
    pub const IDLE_FLIP_MIN_MS: f64 = 800.0;
    pub const IDLE_FLIP_MAX_MS: f64 = 1200.0;
    pub const RESTART_AFTER_DEATH_MS: f64 = 3000.0;
    pub const RESET_HOLD_MS: f64 = 2000.0;
    pub const NAME_ENTRY_KEY_COOLDOWN_MS: f64 = 150.0;

    /// Monster perception
    pub const MONSTER_VISUAL_RANGE: f32 = 10.0 * TILE_SIZE;

    /// Spritesheet frames
    pub const PLAYER_STAND_FRAME: u16 = 76;
    pub const PLAYER_JUMP_FRAME: u16 = 77;
    pub const PLAYER_RUN_FRAME: u16 = 78;
    pub const PLAYER_DEAD_FRAME: u16 = 81;
    pub const PROJECTILE_SMALL_SPAWN_FRAME: u16 = 2652;
    pub const PROJECTILE_SMALL_FLIGHT_FRAME: u16 = 2652;
    pub const PROJECTILE_SMALL_FADE_FRAME: u16 = 2653;
}

/// Euclidean length of a vector given as components
#[inline]
pub fn length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    length(a.x - b.x, a.y - b.y)
}
