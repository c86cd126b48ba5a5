//! Object-layer regions: messages, level exits, start and end of a run

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::player::Player;
use super::timer::Timer;

pub const START_OF_GAME: &str = "Start of Game";
pub const END_OF_GAME: &str = "End of Game";
pub const SPAWN_POINT: &str = "Spawn Point";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectProps {
    pub message: Option<String>,
    pub next_level: Option<String>,
}

/// A named object of the object layer; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: ObjectProps,
}

impl MapObject {
    pub fn region(name: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            properties: ObjectProps::default(),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` lies strictly inside the region
    pub fn contains(&self, point: Vec2) -> bool {
        let c = self.center();
        (point.x - c.x).abs() < self.width / 2.0 && (point.y - c.y).abs() < self.height / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerOutcome {
    /// Level requested by a `nextLevel` region
    pub next_level: Option<String>,
    pub events: Vec<GameEvent>,
}

/// Tracks which regions the player was in on the previous tick
#[derive(Debug, Clone, Default)]
pub struct Triggers {
    message: Option<String>,
    in_start: bool,
    in_end: bool,
}

impl Triggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        time: f64,
        player: &mut Player,
        timer: &mut Timer,
        objects: &[MapObject],
    ) -> TriggerOutcome {
        let pos = player.body.pos;
        let active: Vec<&MapObject> = objects.iter().filter(|o| o.contains(pos)).collect();
        let mut outcome = TriggerOutcome::default();

        let message = active
            .iter()
            .find_map(|o| o.properties.message.clone());
        if message != self.message {
            self.message = message.clone();
            outcome.events.push(GameEvent::Message(message));
        }

        outcome.next_level = active
            .iter()
            .find_map(|o| o.properties.next_level.clone());

        let in_start = active.iter().any(|o| o.name == START_OF_GAME);
        match (self.in_start, in_start) {
            (false, true) => {
                player.set_score(0);
                timer.reset();
                outcome.events.push(GameEvent::ScoreEntryReset);
            }
            (true, false) => timer.start(time),
            _ => {}
        }
        self.in_start = in_start;

        let in_end = active.iter().any(|o| o.name == END_OF_GAME);
        match (self.in_end, in_end) {
            (false, true) => {
                timer.stop(time);
                log::info!("End of game reached with score {}", player.score());
                outcome.events.push(GameEvent::EndOfGame {
                    score: player.score(),
                });
            }
            (true, false) => outcome.events.push(GameEvent::ScoreEntryReset),
            _ => {}
        }
        self.in_end = in_end;

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerId;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(PlayerId(1), Vec2::new(x, y), 70);
        p.drain_events();
        p
    }

    fn sign(x: f32, text: &str) -> MapObject {
        let mut o = MapObject::region("sign", x, 0.0, 32.0, 32.0);
        o.properties.message = Some(text.into());
        o
    }

    #[test]
    fn test_contains_is_strict() {
        let o = MapObject::region("r", 0.0, 0.0, 32.0, 16.0);
        assert!(o.contains(Vec2::new(16.0, 8.0)));
        assert!(o.contains(Vec2::new(0.5, 0.5)));
        assert!(!o.contains(Vec2::new(0.0, 8.0)));
        assert!(!o.contains(Vec2::new(16.0, 16.0)));
        // Point objects never contain anything
        assert!(!MapObject::region(SPAWN_POINT, 5.0, 5.0, 0.0, 0.0).contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_message_published_on_change_only() {
        let objects = [sign(0.0, "Hello"), sign(64.0, "Bye")];
        let mut triggers = Triggers::new();
        let mut timer = Timer::new();
        let mut player = player_at(16.0, 16.0);

        let out = triggers.update(0.0, &mut player, &mut timer, &objects);
        assert_eq!(out.events, vec![GameEvent::Message(Some("Hello".into()))]);
        let out = triggers.update(16.0, &mut player, &mut timer, &objects);
        assert!(out.events.is_empty());

        player.body.pos.x = 48.0;
        let out = triggers.update(32.0, &mut player, &mut timer, &objects);
        assert_eq!(out.events, vec![GameEvent::Message(None)]);

        player.body.pos.x = 80.0;
        let out = triggers.update(48.0, &mut player, &mut timer, &objects);
        assert_eq!(out.events, vec![GameEvent::Message(Some("Bye".into()))]);
    }

    #[test]
    fn test_next_level_region() {
        let mut exit = MapObject::region("exit", 0.0, 0.0, 16.0, 16.0);
        exit.properties.next_level = Some("level2".into());
        let mut player = player_at(8.0, 8.0);
        let out = Triggers::new().update(0.0, &mut player, &mut Timer::new(), &[exit]);
        assert_eq!(out.next_level.as_deref(), Some("level2"));
    }

    #[test]
    fn test_start_region_resets_then_starts_timer() {
        let objects = [MapObject::region(START_OF_GAME, 0.0, 0.0, 32.0, 32.0)];
        let mut triggers = Triggers::new();
        let mut timer = Timer::new();
        timer.start(0.0);
        let mut player = player_at(16.0, 16.0);

        let out = triggers.update(500.0, &mut player, &mut timer, &objects);
        assert_eq!(player.score(), 0);
        assert_eq!(timer.update(900.0), 0.0);
        assert!(out.events.contains(&GameEvent::ScoreEntryReset));
        assert_eq!(player.drain_events(), vec![GameEvent::ScoreChanged(0)]);

        // Staying inside does nothing
        let out = triggers.update(600.0, &mut player, &mut timer, &objects);
        assert!(out.events.is_empty());

        player.body.pos.x = 100.0;
        triggers.update(1000.0, &mut player, &mut timer, &objects);
        assert!(timer.is_running());
        assert_eq!(timer.update(1500.0), 500.0);
    }

    #[test]
    fn test_end_region_stops_timer_and_reports_score() {
        let objects = [MapObject::region(END_OF_GAME, 0.0, 0.0, 32.0, 32.0)];
        let mut triggers = Triggers::new();
        let mut timer = Timer::new();
        timer.start(0.0);
        let mut player = player_at(16.0, 16.0);

        let out = triggers.update(4000.0, &mut player, &mut timer, &objects);
        assert_eq!(out.events, vec![GameEvent::EndOfGame { score: 70 }]);
        assert!(!timer.is_running());
        assert_eq!(timer.update(9000.0), 4000.0);

        player.body.pos.x = 100.0;
        let out = triggers.update(5000.0, &mut player, &mut timer, &objects);
        assert_eq!(out.events, vec![GameEvent::ScoreEntryReset]);
    }

    #[test]
    fn test_object_layer_json() {
        let json = r#"[
            {"name": "sign", "x": 0, "y": 0, "width": 16, "height": 16,
             "properties": {"message": "Hi"}},
            {"name": "exit", "x": 32, "y": 0, "width": 16, "height": 16,
             "properties": {"nextLevel": "level2"}},
            {"name": "Spawn Point", "x": 8, "y": 8}
        ]"#;
        let objects: Vec<MapObject> = serde_json::from_str(json).expect("objects");
        assert_eq!(objects[0].properties.message.as_deref(), Some("Hi"));
        assert_eq!(objects[1].properties.next_level.as_deref(), Some("level2"));
        assert_eq!(objects[2].width, 0.0);
    }
}
