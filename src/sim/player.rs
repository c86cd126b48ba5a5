//! Player controller
//!
//! Each tick the player picks its behaviour by priority: dead, then
//! swimming/climbing (reduced gravity), then on land. Health and score only
//! change through the accessors, which clamp and queue events. Health
//! reaching zero switches to dead at once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Animation, Body, Look};
use super::cooldown::Cooldown;
use super::events::GameEvent;
use super::fsm::{BehaviorState, StateMachine};
use super::input::InputSnapshot;
use super::perception::move_x;
use super::projectile::ProjectileFrames;
use crate::consts::*;

/// Handle to a player, used by projectiles to credit kills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Dead,
    SwimmingOrClimbing,
    OnLand,
}

impl PlayerState {
    /// Selection order; the last entry is always eligible
    pub const PRIORITY: [PlayerState; 3] = [
        PlayerState::Dead,
        PlayerState::SwimmingOrClimbing,
        PlayerState::OnLand,
    ];

    fn is_eligible(self, health: i32, gravity: f32) -> bool {
        match self {
            PlayerState::Dead => health <= 0,
            PlayerState::SwimmingOrClimbing => gravity < 1.0,
            PlayerState::OnLand => true,
        }
    }
}

impl BehaviorState for PlayerState {
    fn name(self) -> &'static str {
        match self {
            PlayerState::Dead => "dead",
            PlayerState::SwimmingOrClimbing => "swimming-or-climbing",
            PlayerState::OnLand => "on-land",
        }
    }
}

/// A projectile the player asked the level to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub owner: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub max_distance: f32,
    pub frames: ProjectileFrames,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    pub body: Body,
    health: i32,
    score: u32,
    gravity: f32,
    machine: StateMachine<PlayerState>,
    fire: Cooldown,
    events: Vec<GameEvent>,
}

impl Player {
    /// Create a player at full health with a carried-over score
    pub fn new(id: PlayerId, spawn: Vec2, score: u32) -> Self {
        let body = Body::new(spawn, Look::Frame(PLAYER_STAND_FRAME))
            .with_drag(PLAYER_DRAG_X, 0.0)
            .with_max_velocity(PLAYER_MAX_VELOCITY_X, PLAYER_MAX_VELOCITY_Y);
        let mut player = Self {
            id,
            body,
            health: 0,
            score: 0,
            gravity: 1.0,
            machine: StateMachine::new("player", PlayerState::OnLand),
            fire: Cooldown::new(FIRE_INTERVAL_MS),
            events: Vec::new(),
        };
        player.set_health(PLAYER_MAX_HEALTH);
        player.set_score(score);
        player
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn gravity_factor(&self) -> f32 {
        self.gravity
    }

    pub fn state(&self) -> PlayerState {
        self.machine.current()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply a health delta, clamped to `0..=PLAYER_MAX_HEALTH`
    ///
    /// A dead player stays dead until the level is rebuilt.
    pub fn change_health(&mut self, delta: i32) {
        if !self.is_alive() {
            return;
        }
        let health = self.health.saturating_add(delta).clamp(0, PLAYER_MAX_HEALTH);
        self.set_health(health);
    }

    fn set_health(&mut self, health: i32) {
        self.health = health;
        if health <= 0 {
            self.machine.go(PlayerState::Dead);
        }
        self.events.push(GameEvent::HealthChanged(health));
    }

    /// Apply a score delta, never dropping below zero
    pub fn change_score(&mut self, delta: i32) {
        let score = if delta < 0 {
            self.score.saturating_sub(delta.unsigned_abs())
        } else {
            self.score.saturating_add(delta as u32)
        };
        self.set_score(score);
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        self.events.push(GameEvent::ScoreChanged(score));
    }

    /// Scale world gravity for this player (1 = normal, 0 = weightless)
    ///
    /// Reapplying the same factor is harmless. Factors outside `0..=1` are
    /// clamped.
    pub fn set_gravity_factor(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        self.gravity = factor;
        self.body.allow_gravity = factor != 0.0;
        self.body.gravity_scale = factor;
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one tick; returns a projectile to spawn when the player fires
    pub fn update(&mut self, time: f64, input: &InputSnapshot) -> Option<ProjectileSpawn> {
        let (health, gravity) = (self.health, self.gravity);
        let state = self
            .machine
            .select(&PlayerState::PRIORITY, |s| s.is_eligible(health, gravity));

        match state {
            PlayerState::Dead => {
                self.update_dead();
                None
            }
            PlayerState::SwimmingOrClimbing => {
                self.update_swimming_or_climbing(input);
                None
            }
            PlayerState::OnLand => {
                let spawn = self.attack(time, input);
                self.move_on_land(input);
                self.body.look = on_land_look(self.body.grounded, self.body.vel.x);
                spawn
            }
        }
    }

    fn update_dead(&mut self) {
        if self.gravity < 1.0 {
            self.body.vel.y = 0.0;
        }
        self.body.look = Look::Frame(PLAYER_DEAD_FRAME);
        self.body.accel.x = 0.0;
    }

    fn update_swimming_or_climbing(&mut self, input: &InputSnapshot) {
        movement_x(&mut self.body, input, PLAYER_ACCELERATION_CLIMBING_OR_SWIMMING);

        self.body.vel.y = if input.up {
            -PLAYER_CLIMB_OR_SWIM_VELOCITY
        } else if input.down {
            PLAYER_CLIMB_OR_SWIM_VELOCITY
        } else {
            0.0
        };
        self.body.look = Look::Frame(PLAYER_JUMP_FRAME);
    }

    fn attack(&mut self, time: f64, input: &InputSnapshot) -> Option<ProjectileSpawn> {
        if !input.attack || !self.fire.try_trigger(time) {
            return None;
        }
        let direction = if self.body.flip_x { -1.0 } else { 1.0 };
        Some(ProjectileSpawn {
            owner: self.id,
            position: self.body.pos,
            velocity: Vec2::new(direction * PROJECTILE_SPEED, 0.0),
            max_distance: PROJECTILE_MAX_DISTANCE,
            frames: ProjectileFrames::SMALL,
        })
    }

    fn move_on_land(&mut self, input: &InputSnapshot) {
        let grounded = self.body.grounded;
        let acceleration = if grounded {
            PLAYER_ACCELERATION_WALKING
        } else {
            PLAYER_ACCELERATION_AIRBORNE
        };
        movement_x(&mut self.body, input, acceleration);

        if grounded && input.up {
            self.body.vel.y = -PLAYER_JUMP_VELOCITY;
        }
    }
}

fn movement_x(body: &mut Body, input: &InputSnapshot, acceleration: f32) {
    if input.left {
        move_x(body, -acceleration);
    } else if input.right {
        move_x(body, acceleration);
    } else {
        body.accel.x = 0.0;
    }
}

/// Look of a living player on land, from grounded state and horizontal speed
pub fn on_land_look(grounded: bool, vx: f32) -> Look {
    match (grounded, vx != 0.0) {
        (true, true) => Look::Animation(Animation::PlayerRun),
        (true, false) => Look::Frame(PLAYER_STAND_FRAME),
        (false, _) => Look::Frame(PLAYER_JUMP_FRAME),
    }
}
