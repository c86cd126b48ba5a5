//! Timestamp-based gates
//!
//! Every timed rule in the simulation is "elapsed since a recorded
//! timestamp" measured against the tick clock. `Mark` is a lazily set
//! timestamp, `Cooldown` is a rate limiter for one specific action.

use serde::{Deserialize, Serialize};

/// A timestamp that is recorded the first time it is needed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    at: Option<f64>,
}

impl Mark {
    /// Return the recorded time, recording `now` if unset
    pub fn get_or_mark(&mut self, now: f64) -> f64 {
        *self.at.get_or_insert(now)
    }

    pub fn set(&mut self, now: f64) {
        self.at = Some(now);
    }

    pub fn clear(&mut self) {
        self.at = None;
    }

    pub fn get(&self) -> Option<f64> {
        self.at
    }

    pub fn elapsed(&self, now: f64) -> Option<f64> {
        self.at.map(|t| now - t)
    }
}

/// Rate limiter: an action may fire once at least `duration_ms` has passed
/// since it last fired
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    duration_ms: f64,
    last: Mark,
}

impl Cooldown {
    pub const fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            last: Mark { at: None },
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_ready(&self, now: f64) -> bool {
        self.last
            .elapsed(now)
            .is_none_or(|elapsed| elapsed >= self.duration_ms)
    }

    pub fn trigger(&mut self, now: f64) {
        self.last.set(now);
    }

    /// Fire if ready; returns whether it fired
    pub fn try_trigger(&mut self, now: f64) -> bool {
        let ready = self.is_ready(now);
        if ready {
            self.trigger(now);
        }
        ready
    }

    /// Time since the action last fired
    pub fn since_last(&self, now: f64) -> Option<f64> {
        self.last.elapsed(now)
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_lazy() {
        let mut mark = Mark::default();
        assert_eq!(mark.elapsed(10.0), None);
        assert_eq!(mark.get_or_mark(10.0), 10.0);
        assert_eq!(mark.get_or_mark(50.0), 10.0);
        assert_eq!(mark.elapsed(50.0), Some(40.0));
        mark.clear();
        assert_eq!(mark.get(), None);
    }

    #[test]
    fn test_cooldown_gates_until_duration() {
        let mut cd = Cooldown::new(250.0);
        assert!(cd.try_trigger(0.0));
        assert!(!cd.try_trigger(100.0));
        assert!(!cd.try_trigger(249.9));
        assert!(cd.try_trigger(250.0));
        assert_eq!(cd.since_last(300.0), Some(50.0));
        cd.reset();
        assert!(cd.is_ready(301.0));
    }
}
