//! Level orchestration
//!
//! A `Level` owns the entities of one loaded map and advances them in a
//! fixed order each tick:
//!
//! 1. reset gesture
//! 2. world tile effects
//! 3. trigger regions
//! 4. dynamic tile pickups
//! 5. player
//! 6. monsters (against the player's current position)
//! 7. run timer
//! 8. projectiles (hits, kill credit, removal)
//! 9. world bounds
//! 10. death and respawn
//!
//! Restarts and level changes are not performed here; they are reported in
//! the tick report and the session rebuilds the level.

use std::fs;
use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::Mark;
use super::dynamic_effects;
use super::events::GameEvent;
use super::input::{InputSnapshot, ResetGesture};
use super::monster::{Monster, Species};
use super::player::{Player, PlayerId};
use super::projectile::{Kill, Projectile};
use super::tiles::TileLayer;
use super::timer::Timer;
use super::triggers::{MapObject, SPAWN_POINT, Triggers};
use super::world_effects::WorldEffects;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Serialized description of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelMap {
    pub name: String,
    /// Static geometry and effect tiles
    pub world: TileLayer,
    /// Consumable tiles, locks and monster markers
    pub dynamic: TileLayer,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

impl LevelMap {
    pub fn from_json(json: &str) -> Result<Self> {
        let map: Self = serde_json::from_str(json).map_err(|source| Error::Json {
            context: "level map".to_string(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidLevel {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Check layer shapes and the spawn point
    pub fn validate(&self) -> Result<()> {
        for layer in [&self.world, &self.dynamic] {
            if !layer.is_well_formed() {
                return Err(self.invalid(format!("layer '{}' has the wrong size", layer.name)));
            }
        }
        if self.world.width == 0 || self.world.height == 0 {
            return Err(self.invalid("world layer is empty"));
        }
        if (self.world.width, self.world.height) != (self.dynamic.width, self.dynamic.height) {
            return Err(self.invalid("world and dynamic layers differ in size"));
        }
        self.spawn_point().map(|_| ())
    }

    pub fn spawn_point(&self) -> Result<Vec2> {
        self.objects
            .iter()
            .find(|o| o.name == SPAWN_POINT)
            .map(|o| Vec2::new(o.x, o.y))
            .ok_or_else(|| self.invalid("no spawn point"))
    }
}

/// Lifecycle request for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSignal {
    ChangeLevel(String),
    Restart,
}

/// Everything observable that happened during one tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub signal: Option<LevelSignal>,
    /// Projectiles whose fade finished this tick
    pub removed_projectiles: Vec<Projectile>,
    pub kills: Vec<Kill>,
    pub events: Vec<GameEvent>,
    pub elapsed_ms: f64,
}

#[derive(Debug)]
pub struct Level {
    name: String,
    world: TileLayer,
    dynamic: TileLayer,
    objects: Vec<MapObject>,
    player: Player,
    monsters: Vec<Monster>,
    projectiles: Vec<Projectile>,
    world_effects: WorldEffects,
    triggers: Triggers,
    reset: ResetGesture,
    died_at: Mark,
    restart_delay_ms: f64,
}

impl Level {
    /// Build a level from its map, carrying over the player's score
    pub fn load<R: Rng + ?Sized>(
        map: &LevelMap,
        score: u32,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Self> {
        map.validate()?;
        let mut dynamic = map.dynamic.clone();
        let monsters = spawn_monsters(&mut dynamic, rng);
        let player = Player::new(PlayerId(0), map.spawn_point()?, score);

        log::info!(
            "Loaded level '{}' ({}x{} tiles, {} monsters)",
            map.name,
            map.world.width,
            map.world.height,
            monsters.len()
        );
        Ok(Self {
            name: map.name.clone(),
            world: map.world.clone(),
            dynamic,
            objects: map.objects.clone(),
            player,
            monsters,
            projectiles: Vec::new(),
            world_effects: WorldEffects::new(),
            triggers: Triggers::new(),
            reset: ResetGesture::new(settings.reset_hold_ms),
            died_at: Mark::default(),
            restart_delay_ms: settings.restart_delay_ms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monsters_mut(&mut self) -> &mut [Monster] {
        &mut self.monsters
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    pub fn world(&self) -> &TileLayer {
        &self.world
    }

    pub fn dynamic(&self) -> &TileLayer {
        &self.dynamic
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Advance one tick
    ///
    /// `reset_pressed` is whether the reset combination is held this tick.
    pub fn tick(
        &mut self,
        time: f64,
        input: &InputSnapshot,
        reset_pressed: bool,
        timer: &mut Timer,
    ) -> TickReport {
        let mut report = TickReport::default();

        if self.reset.update(time, reset_pressed) {
            log::info!("Reset gesture: restarting '{}'", self.name);
            report.signal = Some(LevelSignal::Restart);
            return report;
        }

        self.world_effects.resolve(time, &mut self.player, &self.world);
        let triggered = self
            .triggers
            .update(time, &mut self.player, timer, &self.objects);
        report.events.extend(triggered.events);
        if let Some(pickup) = dynamic_effects::resolve(&mut self.player, &mut self.dynamic) {
            report.events.extend(pickup.lock_event());
        }

        if let Some(spawn) = self.player.update(time, input) {
            self.projectiles.push(Projectile::new(&spawn));
        }
        for monster in &mut self.monsters {
            monster.update(time, &mut self.player, &[&self.world, &self.dynamic]);
        }

        report.elapsed_ms = timer.update(time);
        report.events.push(GameEvent::TimeChanged(report.elapsed_ms));

        self.update_projectiles(time, &mut report);
        self.enforce_world_bounds();

        // Health and score changes of the whole tick, in order
        report.events.extend(self.player.drain_events());

        let restart = self.death_and_respawn(time);
        report.signal = match triggered.next_level {
            Some(next) => {
                log::info!("Level change requested: '{}' -> '{next}'", self.name);
                Some(LevelSignal::ChangeLevel(next))
            }
            None if restart => {
                log::info!("Player died: restarting '{}'", self.name);
                Some(LevelSignal::Restart)
            }
            None => None,
        };
        report
    }

    fn update_projectiles(&mut self, time: f64, report: &mut TickReport) {
        let mut i = 0;
        while i < self.projectiles.len() {
            let step = self.projectiles[i].update(time, &mut self.monsters);
            if let Some(kill) = step.kill {
                if kill.owner == self.player.id() {
                    let reward = i32::try_from(kill.reward).unwrap_or(i32::MAX);
                    self.player.change_score(reward);
                }
                report.events.push(GameEvent::MonsterKilled {
                    species: kill.species,
                    reward: kill.reward,
                });
                report.kills.push(kill);
            }
            if step.gone {
                report.removed_projectiles.push(self.projectiles.remove(i));
            } else {
                i += 1;
            }
        }
    }

    fn enforce_world_bounds(&mut self) {
        let half = TILE_SIZE / 2.0;
        let pos = &mut self.player.body.pos;
        pos.x = pos.x.max(half).min(self.world.width_px() - half);

        if pos.y > self.world.height_px() {
            self.player.change_health(INSTANT_DEATH_DELTA);
        }
    }

    /// Whether the player has been dead for longer than the restart delay
    fn death_and_respawn(&mut self, time: f64) -> bool {
        if self.player.is_alive() {
            self.died_at.clear();
            return false;
        }
        let died_at = self.died_at.get_or_mark(time);
        time - died_at > self.restart_delay_ms
    }
}

/// Replace monster markers in the dynamic layer with monsters
///
/// Every marker tile is removed; unknown markers spawn nothing.
fn spawn_monsters<R: Rng + ?Sized>(dynamic: &mut TileLayer, rng: &mut R) -> Vec<Monster> {
    let markers = dynamic.positions_where(|t| t.props.monster.is_some());
    let mut monsters = Vec::with_capacity(markers.len());
    for (tx, ty) in markers {
        let Some(marker) = dynamic.remove_tile_at(tx, ty).and_then(|t| t.props.monster) else {
            continue;
        };
        match Species::from_marker(&marker) {
            Some(species) => {
                monsters.push(Monster::spawn(species, TileLayer::tile_center(tx, ty), rng));
            }
            None => log::debug!("Skipping unknown monster marker '{marker}' at ({tx}, {ty})"),
        }
    }
    monsters
}
