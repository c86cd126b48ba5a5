//! Static-layer effects on the player: gravity zones and healing tiles

use glam::Vec2;

use super::cooldown::Cooldown;
use super::player::Player;
use super::tiles::{TileLayer, TileProps};
use crate::consts::HEAL_INTERVAL_MS;

/// Effective properties under the player for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileEffect {
    pub gravity: f32,
    pub heals: Option<i32>,
}

impl TileEffect {
    /// Merge property sets; for each property the first set defining it wins
    pub fn merge<'a, I>(props: I) -> Self
    where
        I: IntoIterator<Item = &'a TileProps> + Clone,
    {
        Self {
            gravity: props
                .clone()
                .into_iter()
                .find_map(|p| p.gravity)
                .unwrap_or(1.0),
            heals: props.into_iter().find_map(|p| p.heals),
        }
    }
}

/// Applies gravity and rate-limited healing from the world layer
#[derive(Debug, Clone)]
pub struct WorldEffects {
    heal: Cooldown,
    last_heal_amount: Option<i32>,
}

impl Default for WorldEffects {
    fn default() -> Self {
        Self {
            heal: Cooldown::new(HEAL_INTERVAL_MS),
            last_heal_amount: None,
        }
    }
}

impl WorldEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the tiles under the player and apply their effects
    pub fn resolve(&mut self, time: f64, player: &mut Player, world: &TileLayer) -> TileEffect {
        let body = player.body.pos;
        let feet = body + Vec2::new(0.0, player.body.size.y / 2.0 + 2.0);
        let body_props = world.tile_at_world(body).map(|t| &t.props);
        let feet_props = world.tile_at_world(feet).map(|t| &t.props);

        // Standing on top of a ladder or liquid counts as being in it
        let sampled = [body_props, feet_props];
        let climbable = sampled
            .iter()
            .flatten()
            .any(|p| p.is_ladder() || p.is_liquid());
        let effect = if climbable {
            TileEffect::merge(sampled.iter().flatten().copied())
        } else {
            TileEffect::merge(body_props)
        };

        player.set_gravity_factor(effect.gravity);
        if let Some(amount) = effect.heals.filter(|&a| a != 0) {
            self.heal_player(time, player, amount);
        }
        effect
    }

    fn heal_player(&mut self, time: f64, player: &mut Player, amount: i32) {
        let changed = self.last_heal_amount != Some(amount);
        if changed || self.heal.is_ready(time) {
            self.last_heal_amount = Some(amount);
            self.heal.trigger(time);
            player.change_health(amount);
        }
    }
}
