//! Physics body proxy
//!
//! The physics collaborator owns integration and collision resolution. The
//! simulation only writes intents (acceleration, velocity, gravity scale,
//! facing, look) and reads back position, velocity and the grounded flag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Looping animations the renderer knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    PlayerRun,
}

/// What the renderer should show for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Look {
    /// Static spritesheet frame (animation stopped)
    Frame(u16),
    /// Looping animation
    Animation(Animation),
}

/// Per-entity physics state shared with the physics collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the sprite
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub drag: Vec2,
    pub max_vel: Vec2,
    /// Sprite frame extents (unscaled), used for overlap tests and sensors
    pub size: Vec2,
    /// Render scale of the sprite
    pub scale: f32,
    /// Resting on ground this frame (written by the physics collaborator)
    pub grounded: bool,
    /// Facing left
    pub flip_x: bool,
    /// Multiplier of the world gravity
    pub gravity_scale: f32,
    pub allow_gravity: bool,
    pub look: Look,
}

impl Body {
    pub fn new(pos: Vec2, look: Look) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            drag: Vec2::ZERO,
            max_vel: Vec2::splat(f32::INFINITY),
            size: Vec2::splat(TILE_SIZE),
            scale: 1.0,
            grounded: false,
            flip_x: false,
            gravity_scale: 1.0,
            allow_gravity: true,
            look,
        }
    }

    pub fn with_drag(mut self, x: f32, y: f32) -> Self {
        self.drag = Vec2::new(x, y);
        self
    }

    pub fn with_max_velocity(mut self, x: f32, y: f32) -> Self {
        self.max_vel = Vec2::new(x, y);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.allow_gravity = false;
        self
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        crate::length(self.vel.x, self.vel.y)
    }

    /// Half-extent overlap test against another body
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = (self.size + other.size) / 2.0;
        (self.pos.x - other.pos.x).abs() < reach.x && (self.pos.y - other.pos.y).abs() < reach.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_uses_half_extent_sum() {
        let a = Body::new(Vec2::new(0.0, 0.0), Look::Frame(0));
        let mut b = Body::new(Vec2::new(15.9, 0.0), Look::Frame(0));
        assert!(a.overlaps(&b));

        b.pos.x = 16.0;
        assert!(!a.overlaps(&b));

        b.pos = Vec2::new(0.0, -15.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_speed() {
        let body = Body::new(Vec2::ZERO, Look::Frame(0)).with_velocity(Vec2::new(3.0, 4.0));
        assert!((body.speed() - 5.0).abs() < 1e-6);
    }
}
