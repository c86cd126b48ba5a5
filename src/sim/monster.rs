//! Melee monsters
//!
//! All species share one controller, parameterised by `MonsterConfig`:
//! idle (look around, watch for the player), attacking (chase and bite),
//! dead (terminal). Death is entered from `change_health`, never from the
//! state handlers themselves.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Look};
use super::cooldown::{Cooldown, Mark};
use super::fsm::{BehaviorState, StateMachine};
use super::perception::{approaches_hole, approaches_obstacle, can_see, move_x};
use super::player::Player;
use super::tiles::TileLayer;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Spider,
    Zombie,
    Scorpion,
    Rat,
    Ice,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Spider,
        Species::Zombie,
        Species::Scorpion,
        Species::Rat,
        Species::Ice,
    ];

    /// Species for a `monster` tile marker; unknown markers yield `None`
    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.marker() == marker)
    }

    pub fn marker(self) -> &'static str {
        match self {
            Species::Spider => "spider",
            Species::Zombie => "zombie",
            Species::Scorpion => "Scorpion",
            Species::Rat => "Rat",
            Species::Ice => "Ice",
        }
    }

    pub fn params(self) -> &'static SpeciesParams {
        match self {
            Species::Spider => &SPIDER,
            Species::Zombie => &ZOMBIE,
            Species::Scorpion => &SCORPION,
            Species::Rat => &RAT,
            Species::Ice => &ICE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterFrames {
    pub stand: u16,
    pub attack: u16,
    pub dead: u16,
    pub moving: u16,
}

/// Base tuning of a species, before per-monster jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesParams {
    pub frames: MonsterFrames,
    pub speed: f32,
    /// Relative jitter of the horizontal max velocity
    pub speed_jitter: f32,
    /// Relative jitter of the vertical max velocity
    pub fall_jitter: f32,
    pub health: i32,
    pub attack_delay_ms: f64,
    /// Upward impulse (negative, y points down)
    pub jump_velocity: f32,
    pub damage: i32,
    pub score: u32,
    pub scale: f32,
}

const SPIDER: SpeciesParams = SpeciesParams {
    frames: MonsterFrames {
        stand: 576,
        attack: 580,
        dead: 581,
        moving: 576,
    },
    speed: 80.0,
    speed_jitter: 0.2,
    fall_jitter: 0.05,
    health: 2,
    attack_delay_ms: 600.0,
    jump_velocity: -300.0,
    damage: 1,
    score: 20,
    scale: 0.75,
};

const ZOMBIE: SpeciesParams = SpeciesParams {
    frames: MonsterFrames {
        stand: 276,
        attack: 280,
        dead: 281,
        moving: 277,
    },
    speed: 32.0,
    speed_jitter: 0.1,
    fall_jitter: 0.02,
    health: 7,
    attack_delay_ms: 1500.0,
    jump_velocity: -200.0,
    damage: 2,
    score: 40,
    scale: 1.2,
};

const SCORPION: SpeciesParams = SpeciesParams {
    frames: MonsterFrames {
        stand: 540,
        attack: 542,
        dead: 543,
        moving: 539,
    },
    speed: 45.0,
    speed_jitter: 0.05,
    fall_jitter: 0.02,
    health: 4,
    attack_delay_ms: 700.0,
    jump_velocity: -240.0,
    damage: 2,
    score: 50,
    scale: 1.0,
};

const RAT: SpeciesParams = SpeciesParams {
    frames: MonsterFrames {
        stand: 480,
        attack: 477,
        dead: 481,
        moving: 476,
    },
    speed: 90.0,
    speed_jitter: 0.05,
    fall_jitter: 0.02,
    health: 1,
    attack_delay_ms: 2000.0,
    jump_velocity: -200.0,
    damage: 1,
    score: 10,
    scale: 0.75,
};

const ICE: SpeciesParams = SpeciesParams {
    frames: MonsterFrames {
        stand: 638,
        attack: 639,
        dead: 643,
        moving: 638,
    },
    speed: 32.0,
    speed_jitter: 0.05,
    fall_jitter: 0.02,
    health: 2,
    attack_delay_ms: 2000.0,
    jump_velocity: -170.0,
    damage: 1,
    score: 25,
    scale: 1.0,
};

/// Tuning of one monster instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterConfig {
    pub frames: MonsterFrames,
    pub drag_x: f32,
    pub max_velocity: Vec2,
    pub health: i32,
    pub attack_delay_ms: f64,
    pub jump_velocity: f32,
    pub damage: i32,
    pub score: u32,
    pub scale: f32,
    /// Interval between idle look-arounds
    pub flip_delay_ms: f64,
}

impl MonsterConfig {
    /// Species tuning without jitter
    pub fn for_species(species: Species) -> Self {
        let p = species.params();
        Self {
            frames: p.frames,
            drag_x: 0.75 * PLAYER_DRAG_X,
            max_velocity: Vec2::new(p.speed, PLAYER_MAX_VELOCITY_Y),
            health: p.health,
            attack_delay_ms: p.attack_delay_ms,
            jump_velocity: p.jump_velocity,
            damage: p.damage,
            score: p.score,
            scale: p.scale,
            flip_delay_ms: (IDLE_FLIP_MIN_MS + IDLE_FLIP_MAX_MS) / 2.0,
        }
    }

    /// Species tuning with randomised speeds and look-around interval
    pub fn roll<R: Rng + ?Sized>(species: Species, rng: &mut R) -> Self {
        let p = species.params();
        let mut config = Self::for_species(species);
        config.max_velocity.x *= plus_minus(rng, p.speed_jitter);
        config.max_velocity.y *= plus_minus(rng, p.fall_jitter);
        config.flip_delay_ms = rng.random_range(IDLE_FLIP_MIN_MS..IDLE_FLIP_MAX_MS);
        config
    }
}

fn plus_minus<R: Rng + ?Sized>(rng: &mut R, delta: f32) -> f32 {
    rng.random_range(1.0 - delta..1.0 + delta)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterState {
    Idle,
    Attacking,
    Dead,
}

impl BehaviorState for MonsterState {
    fn name(self) -> &'static str {
        match self {
            MonsterState::Idle => "idle",
            MonsterState::Attacking => "attacking",
            MonsterState::Dead => "dead",
        }
    }
}

/// Per-state handlers and the timestamps they keep
#[derive(Debug, Clone)]
struct MeleeAi {
    config: MonsterConfig,
    last_flip: Mark,
    bite: Cooldown,
    last_hit: Mark,
}

impl MeleeAi {
    fn idle(
        &mut self,
        time: f64,
        body: &mut Body,
        player: &Player,
        layers: &[&TileLayer],
    ) -> Option<MonsterState> {
        let last_flip = self.last_flip.get_or_mark(time);
        if time - last_flip > self.config.flip_delay_ms {
            self.last_flip.set(time);
            body.flip_x = !body.flip_x;
        }
        let sees = can_see(
            player.body.pos,
            body.pos,
            layers,
            Some(MONSTER_VISUAL_RANGE),
        );
        if sees {
            // The first bite waits a full attack delay after engagement
            self.bite.trigger(time);
        }
        sees.then_some(MonsterState::Attacking)
    }

    /// Chase and bite; once engaged the monster never disengages
    fn attack(
        &mut self,
        time: f64,
        body: &mut Body,
        player: &mut Player,
        layers: &[&TileLayer],
    ) -> Option<MonsterState> {
        let delta = player.body.pos - body.pos;
        let (dx, dy) = (delta.x.abs(), delta.y.abs());
        if dx < 0.5 * TILE_SIZE && dy < 0.5 * TILE_SIZE {
            self.bite(time, body, player);
        } else {
            self.run_to(body, player.body.pos, dx, layers);
        }
        None
    }

    fn bite(&mut self, time: f64, body: &mut Body, player: &mut Player) {
        let frames = self.config.frames;
        // Cooldown wins over the flourish window
        if self.bite.try_trigger(time) {
            player.change_health(-self.config.damage);
            self.last_hit.set(time);
            body.look = Look::Frame(frames.attack);
            return;
        }
        let flourish = self
            .last_hit
            .elapsed(time)
            .is_some_and(|since| since < MELEE_FLOURISH_MS);
        body.look = Look::Frame(if flourish { frames.attack } else { frames.stand });
    }

    fn run_to(&mut self, body: &mut Body, target: Vec2, dx: f32, layers: &[&TileLayer]) {
        let factor = if target.x < body.pos.x { -1.0 } else { 1.0 };
        move_x(body, factor * PLAYER_ACCELERATION_WALKING);

        let wants_jump = approaches_obstacle(body, factor * 1.5 * TILE_SIZE, layers)
            || approaches_hole(body, factor * 0.5 * TILE_SIZE, layers)
            || (dx < TILE_SIZE && body.pos.y - target.y > 1.5 * TILE_SIZE);
        if wants_jump && body.grounded {
            body.vel.y = self.config.jump_velocity;
        }
        body.look = Look::Frame(self.config.frames.moving);
    }

    fn dead(&self, body: &mut Body) -> Option<MonsterState> {
        body.look = Look::Frame(self.config.frames.dead);
        body.accel.x = 0.0;
        None
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    species: Species,
    pub body: Body,
    health: i32,
    machine: StateMachine<MonsterState>,
    ai: MeleeAi,
}

impl Monster {
    pub fn new(species: Species, config: MonsterConfig, pos: Vec2) -> Self {
        let body = Body::new(pos, Look::Frame(config.frames.stand))
            .with_drag(config.drag_x, 0.0)
            .with_max_velocity(config.max_velocity.x, config.max_velocity.y)
            .with_scale(config.scale);
        Self {
            species,
            body,
            health: config.health,
            machine: StateMachine::new("monster", MonsterState::Idle),
            ai: MeleeAi {
                config,
                last_flip: Mark::default(),
                bite: Cooldown::new(config.attack_delay_ms),
                last_hit: Mark::default(),
            },
        }
    }

    /// Spawn a monster of `species` with jittered tuning
    pub fn spawn<R: Rng + ?Sized>(species: Species, pos: Vec2, rng: &mut R) -> Self {
        Self::new(species, MonsterConfig::roll(species, rng), pos)
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn config(&self) -> &MonsterConfig {
        &self.ai.config
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn score_reward(&self) -> u32 {
        self.ai.config.score
    }

    pub fn state(&self) -> MonsterState {
        self.machine.current()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage (negative delta); returns true when this call killed it
    ///
    /// A dead monster ignores further changes.
    pub fn change_health(&mut self, delta: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health + delta).max(0);
        if self.health > 0 {
            return false;
        }
        self.machine.go(MonsterState::Dead);
        log::info!("{:?} killed at {:?}", self.species, self.body.pos);
        true
    }

    pub fn update(&mut self, time: f64, player: &mut Player, layers: &[&TileLayer]) {
        let Self {
            machine, ai, body, ..
        } = self;
        machine.advance(|state| match state {
            MonsterState::Idle => ai.idle(time, body, player, layers),
            MonsterState::Attacking => ai.attack(time, body, player, layers),
            MonsterState::Dead => ai.dead(body),
        });
    }
}
