//! Geometry and perception helpers
//!
//! Pure functions over tile layers and bodies. Sensors are sample points
//! offset from a body that test the terrain ahead before it commits to a move.

use glam::Vec2;

use super::body::Body;
use super::tiles::TileLayer;
use crate::distance;

/// A line segment between two world points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// Sight line from `a` to `b`, or `None` when `b` is beyond `visual_range`
///
/// A missing range means unlimited sight.
pub fn line_of_sight(a: Vec2, b: Vec2, visual_range: Option<f32>) -> Option<Segment> {
    match visual_range {
        Some(range) if distance(a, b) > range => None,
        _ => Some(Segment { start: a, end: b }),
    }
}

/// Whether `a` sees `b`: in range and no colliding tile on the segment in any layer
pub fn can_see(a: Vec2, b: Vec2, layers: &[&TileLayer], visual_range: Option<f32>) -> bool {
    let Some(line) = line_of_sight(a, b, visual_range) else {
        return false;
    };
    !layers
        .iter()
        .any(|layer| layer.blocks_segment(line.start, line.end))
}

/// Sample point level with the body, `offset` pixels ahead
pub fn obstacle_sensor(body: &Body, offset: f32) -> Vec2 {
    Vec2::new(body.pos.x + offset, body.pos.y)
}

/// Whether something solid stands between the body and its obstacle sensor
pub fn approaches_obstacle(body: &Body, offset: f32, layers: &[&TileLayer]) -> bool {
    !can_see(body.pos, obstacle_sensor(body, offset), layers, None)
}

/// Sample point one body height below, `offset` pixels ahead
pub fn hole_sensor(body: &Body, offset: f32) -> Vec2 {
    Vec2::new(body.pos.x + offset, body.pos.y + body.size.y)
}

/// Whether the ground ends ahead of the body
pub fn approaches_hole(body: &Body, offset: f32, layers: &[&TileLayer]) -> bool {
    !is_solid_at(hole_sensor(body, offset), layers)
}

pub fn is_solid_at(point: Vec2, layers: &[&TileLayer]) -> bool {
    layers.iter().any(|layer| layer.is_solid_at(point))
}

/// Apply horizontal acceleration with the anti-snap rule
///
/// A request against the current direction of travel zeroes the
/// acceleration instead, so drag brakes the body before it turns. Facing
/// follows the requested direction either way.
pub fn move_x(body: &mut Body, acceleration: f32) {
    let vx = body.vel.x;
    let reverses = vx != 0.0 && vx.signum() != acceleration.signum();
    body.accel.x = if reverses { 0.0 } else { acceleration };
    body.flip_x = acceleration < 0.0;
}
