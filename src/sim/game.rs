//! Game session: level catalog, current level and run timer
//!
//! The session applies the level's lifecycle requests. A restart rebuilds
//! the current level and a level change loads another one; both keep the
//! player's score and the run timer.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameObserver, dispatch};
use super::input::InputSnapshot;
use super::level::{Level, LevelMap, LevelSignal, TickReport};
use super::timer::Timer;
use crate::error::{Error, Result};
use crate::settings::Settings;

#[derive(Debug)]
pub struct Game {
    maps: BTreeMap<String, LevelMap>,
    settings: Settings,
    rng: Pcg32,
    level: Level,
    timer: Timer,
}

impl Game {
    /// Start a session on the configured start level
    pub fn new<I>(maps: I, settings: Settings) -> Result<Self>
    where
        I: IntoIterator<Item = LevelMap>,
    {
        let maps: BTreeMap<_, _> = maps.into_iter().map(|m| (m.name.clone(), m)).collect();
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let map = maps
            .get(&settings.start_level)
            .ok_or_else(|| Error::UnknownLevel(settings.start_level.clone()))?;
        let level = Level::load(map, 0, &settings, &mut rng)?;
        Ok(Self {
            maps,
            settings,
            rng,
            level,
            timer: Timer::new(),
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Advance the current level and apply its lifecycle request
    pub fn tick(
        &mut self,
        time: f64,
        input: &InputSnapshot,
        reset_pressed: bool,
        observer: &mut dyn GameObserver,
    ) -> TickReport {
        let report = self.level.tick(time, input, reset_pressed, &mut self.timer);
        dispatch(&report.events, observer);

        match &report.signal {
            Some(LevelSignal::ChangeLevel(name)) => {
                if let Err(err) = self.switch_to(name) {
                    log::warn!("Staying on '{}': {err}", self.level.name());
                }
            }
            Some(LevelSignal::Restart) => {
                let name = self.level.name().to_string();
                if let Err(err) = self.switch_to(&name) {
                    log::warn!("Restart failed: {err}");
                }
            }
            None => {}
        }
        report
    }

    /// Replace the current level, carrying over the score
    pub fn switch_to(&mut self, name: &str) -> Result<()> {
        let map = self
            .maps
            .get(name)
            .ok_or_else(|| Error::UnknownLevel(name.to_string()))?;
        let score = self.level.player().score();
        self.level = Level::load(map, score, &self.settings, &mut self.rng)?;
        Ok(())
    }
}
