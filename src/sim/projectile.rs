//! Projectile lifecycle: spawning, flying, fading
//!
//! A projectile fades once it has travelled past its range or has stopped
//! (a hit stops it). It reports itself gone `PROJECTILE_FADE_MS` after the
//! fade began; the level drops it then.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Look};
use super::cooldown::Mark;
use super::fsm::{BehaviorState, StateMachine};
use super::monster::{Monster, Species};
use super::player::{PlayerId, ProjectileSpawn};
use crate::consts::*;
use crate::distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Spawning,
    Flying,
    Fading,
}

impl ProjectileState {
    const PRIORITY: [ProjectileState; 3] = [
        ProjectileState::Fading,
        ProjectileState::Spawning,
        ProjectileState::Flying,
    ];
}

impl BehaviorState for ProjectileState {
    fn name(self) -> &'static str {
        match self {
            ProjectileState::Spawning => "spawning",
            ProjectileState::Flying => "flying",
            ProjectileState::Fading => "fading",
        }
    }
}

/// Spritesheet frames of a projectile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileFrames {
    pub spawn: u16,
    pub flight: u16,
    pub fade: u16,
}

impl ProjectileFrames {
    pub const SMALL: Self = Self {
        spawn: PROJECTILE_SMALL_SPAWN_FRAME,
        flight: PROJECTILE_SMALL_FLIGHT_FRAME,
        fade: PROJECTILE_SMALL_FADE_FRAME,
    };
}

/// A monster killed by a projectile, to be credited to `owner`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kill {
    pub owner: PlayerId,
    pub species: Species,
    pub reward: u32,
}

/// Outcome of one projectile tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectileStep {
    /// The fade window is over; discard the projectile
    pub gone: bool,
    pub kill: Option<Kill>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    owner: PlayerId,
    pub body: Body,
    origin: Vec2,
    max_distance: f32,
    frames: ProjectileFrames,
    machine: StateMachine<ProjectileState>,
    created: Mark,
    fade_started: Mark,
}

impl Projectile {
    pub fn new(spawn: &ProjectileSpawn) -> Self {
        let mut body = Body::new(spawn.position, Look::Frame(spawn.frames.spawn))
            .with_velocity(spawn.velocity)
            .without_gravity();
        body.flip_x = spawn.velocity.x < 0.0;
        Self {
            owner: spawn.owner,
            body,
            origin: spawn.position,
            max_distance: spawn.max_distance,
            frames: spawn.frames,
            machine: StateMachine::new("projectile", ProjectileState::Spawning),
            created: Mark::default(),
            fade_started: Mark::default(),
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn state(&self) -> ProjectileState {
        self.machine.current()
    }

    /// Distance from the creation point
    pub fn traveled(&self) -> f32 {
        distance(self.origin, self.body.pos)
    }

    pub fn update(&mut self, time: f64, monsters: &mut [Monster]) -> ProjectileStep {
        let created = self.created.get_or_mark(time);
        let fades = self.traveled() > self.max_distance || self.body.speed() == 0.0;
        let state = self.machine.select(&ProjectileState::PRIORITY, |s| match s {
            ProjectileState::Fading => fades,
            ProjectileState::Spawning => time - created < PROJECTILE_SPAWN_MS,
            ProjectileState::Flying => true,
        });

        match state {
            ProjectileState::Fading => {
                let fade_started = self.fade_started.get_or_mark(time);
                self.body.look = Look::Frame(self.frames.fade);
                self.body.vel = Vec2::ZERO;
                ProjectileStep {
                    gone: time - fade_started >= PROJECTILE_FADE_MS,
                    kill: None,
                }
            }
            ProjectileState::Spawning => {
                self.body.look = Look::Frame(self.frames.spawn);
                ProjectileStep::default()
            }
            ProjectileState::Flying => {
                self.body.look = Look::Frame(self.frames.flight);
                let Some(target) = monsters
                    .iter_mut()
                    .find(|m| m.is_alive() && self.body.overlaps(&m.body))
                else {
                    return ProjectileStep::default();
                };
                // Stopped: starts fading next tick
                self.body.vel = Vec2::ZERO;
                let kill = target.change_health(-1).then(|| Kill {
                    owner: self.owner,
                    species: target.species(),
                    reward: target.score_reward(),
                });
                ProjectileStep { gone: false, kill }
            }
        }
    }
}
