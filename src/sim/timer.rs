//! Run timer
//!
//! Measures active play time between `start` and `stop`. The value is
//! derived from tick timestamps; the timer never reads a clock itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    start: Option<f64>,
    end: Option<f64>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn start(&mut self, time: f64) {
        self.start = Some(time);
        self.end = None;
    }

    pub fn stop(&mut self, time: f64) {
        self.end = Some(time);
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Elapsed active time at tick `time` (0 when never started)
    pub fn update(&self, time: f64) -> f64 {
        match self.start {
            Some(start) => self.end.unwrap_or(time) - start,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_lifecycle() {
        let mut timer = Timer::new();
        assert_eq!(timer.update(500.0), 0.0);
        assert!(!timer.is_running());

        timer.start(1000.0);
        assert!(timer.is_running());
        assert_eq!(timer.update(1500.0), 500.0);

        timer.stop(2000.0);
        assert!(!timer.is_running());
        assert_eq!(timer.update(9000.0), 1000.0);

        timer.start(10_000.0);
        assert_eq!(timer.update(10_250.0), 250.0);

        timer.reset();
        assert_eq!(timer.update(20_000.0), 0.0);
    }
}
