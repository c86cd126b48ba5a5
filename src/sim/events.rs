//! Notifications from the simulation to presentation
//!
//! Entities queue `GameEvent`s during a tick; the level hands them out in
//! its tick report and `dispatch` forwards them to an observer. Delivery is
//! fire-and-forget.

use serde::{Deserialize, Serialize};

use super::monster::Species;

/// Something observers may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    HealthChanged(i32),
    ScoreChanged(u32),
    /// Elapsed run time in milliseconds (published every tick)
    TimeChanged(f64),
    /// Message of the trigger region the player stands in (None clears it)
    Message(Option<String>),
    MonsterKilled { species: Species, reward: u32 },
    LockOpened { name: String, tiles: usize },
    /// The player entered the start region: clear any pending score entry
    ScoreEntryReset,
    /// The player reached the end region with this score
    EndOfGame { score: u32 },
}

/// Presentation-side receiver of simulation events
///
/// Every method defaults to a no-op so observers implement only what they
/// display.
pub trait GameObserver {
    fn on_health_changed(&mut self, _health: i32) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_time_changed(&mut self, _elapsed_ms: f64) {}
    fn on_message(&mut self, _message: Option<&str>) {}
    fn on_monster_killed(&mut self, _species: Species, _reward: u32) {}
    fn on_lock_opened(&mut self, _name: &str) {}
    fn on_score_entry_reset(&mut self) {}
    fn on_end_of_game(&mut self, _score: u32) {}
}

/// Forward events to an observer in order
pub fn dispatch(events: &[GameEvent], observer: &mut dyn GameObserver) {
    for event in events {
        match event {
            GameEvent::HealthChanged(health) => observer.on_health_changed(*health),
            GameEvent::ScoreChanged(score) => observer.on_score_changed(*score),
            GameEvent::TimeChanged(ms) => observer.on_time_changed(*ms),
            GameEvent::Message(message) => observer.on_message(message.as_deref()),
            GameEvent::MonsterKilled { species, reward } => {
                observer.on_monster_killed(*species, *reward)
            }
            GameEvent::LockOpened { name, .. } => observer.on_lock_opened(name),
            GameEvent::ScoreEntryReset => observer.on_score_entry_reset(),
            GameEvent::EndOfGame { score } => observer.on_end_of_game(*score),
        }
    }
}

/// Observer that keeps the latest HUD-relevant values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub health: i32,
    pub score: u32,
    pub elapsed_ms: f64,
    pub message: Option<String>,
    pub health_updates: u32,
    pub score_updates: u32,
}

impl GameObserver for HudState {
    fn on_health_changed(&mut self, health: i32) {
        self.health = health;
        self.health_updates += 1;
    }

    fn on_score_changed(&mut self, score: u32) {
        self.score = score;
        self.score_updates += 1;
    }

    fn on_time_changed(&mut self, elapsed_ms: f64) {
        self.elapsed_ms = elapsed_ms;
    }

    fn on_message(&mut self, message: Option<&str>) {
        self.message = message.map(str::to_owned);
    }
}
