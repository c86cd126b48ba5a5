//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the tick timestamp only
//! - Seeded RNG only
//! - Stable iteration order (load order of entities)
//! - No rendering, physics integration or platform dependencies

pub mod body;
pub mod cooldown;
pub mod dynamic_effects;
pub mod events;
pub mod fsm;
pub mod game;
pub mod input;
pub mod level;
pub mod monster;
pub mod perception;
pub mod player;
pub mod projectile;
pub mod tiles;
pub mod timer;
pub mod triggers;
pub mod world_effects;

pub use body::{Animation, Body, Look};
pub use cooldown::{Cooldown, Mark};
pub use dynamic_effects::Pickup;
pub use events::{GameEvent, GameObserver, HudState, dispatch};
pub use fsm::{BehaviorState, StateMachine};
pub use game::Game;
pub use input::{InputSnapshot, ResetGesture};
pub use level::{Level, LevelMap, LevelSignal, TickReport};
pub use monster::{Monster, MonsterConfig, MonsterState, Species};
pub use perception::{can_see, line_of_sight, move_x};
pub use player::{Player, PlayerId, PlayerState, ProjectileSpawn};
pub use projectile::{Kill, Projectile, ProjectileFrames, ProjectileState, ProjectileStep};
pub use tiles::{Tile, TileLayer, TileProps};
pub use timer::Timer;
pub use triggers::{MapObject, Triggers};
pub use world_effects::{TileEffect, WorldEffects};
