//! Per-tick input intent
//!
//! Device polling happens outside the simulation. Each source reports an
//! `InputSnapshot`; sources are merged with logical OR. A missing source
//! (no gamepad connected) contributes nothing.

use serde::{Deserialize, Serialize};

use super::cooldown::Mark;

/// Logical buttons held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
}

impl InputSnapshot {
    pub fn merge(self, other: Self) -> Self {
        Self {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            attack: self.attack || other.attack,
        }
    }

    /// OR-merge any number of sources; absent ones are skipped
    pub fn combine<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Option<Self>>,
    {
        sources
            .into_iter()
            .flatten()
            .fold(Self::default(), Self::merge)
    }
}

/// Detects the sustained reset gesture
///
/// Fires once the combination has been held for longer than the hold
/// duration, then starts over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResetGesture {
    hold_ms: f64,
    pressed_since: Mark,
}

impl ResetGesture {
    pub fn new(hold_ms: f64) -> Self {
        Self {
            hold_ms,
            pressed_since: Mark::default(),
        }
    }

    pub fn update(&mut self, time: f64, pressing: bool) -> bool {
        if !pressing {
            self.pressed_since.clear();
            return false;
        }
        let since = self.pressed_since.get_or_mark(time);
        if time - since > self.hold_ms {
            self.pressed_since.clear();
            true
        } else {
            false
        }
    }
}
