//! Behaviour state machine
//!
//! States are closed enums, so every state has a handler by construction.
//! The owner keeps the current state and, once per tick, either lets the
//! current state's handler name a successor (`advance`) or picks the first
//! eligible state from a priority list (`select`). There are no enter/exit
//! callbacks: handlers derive first-tick behaviour from lazily recorded
//! timestamps.

use std::fmt::Debug;

/// A closed set of behaviour states
pub trait BehaviorState: Copy + Eq + Debug {
    /// Stable name used in logs
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct StateMachine<S: BehaviorState> {
    current: S,
    /// Owner label for transition logs
    owner: &'static str,
}

impl<S: BehaviorState> StateMachine<S> {
    pub fn new(owner: &'static str, initial: S) -> Self {
        Self {
            current: initial,
            owner,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// Run the current state's handler; a returned state becomes current
    pub fn advance<F>(&mut self, handler: F) -> S
    where
        F: FnOnce(S) -> Option<S>,
    {
        if let Some(next) = handler(self.current) {
            self.go(next);
        }
        self.current
    }

    /// Make the first eligible state of `priority` current
    ///
    /// `priority` must end with a state that is always eligible; if none
    /// matches the current state is kept.
    pub fn select<P>(&mut self, priority: &[S], eligible: P) -> S
    where
        P: Fn(S) -> bool,
    {
        if let Some(next) = priority.iter().copied().find(|s| eligible(*s)) {
            self.go(next);
        }
        self.current
    }

    /// Transition from outside the handlers (e.g. damage killing an entity)
    pub fn go(&mut self, next: S) {
        if next != self.current {
            log::debug!(
                "{}: {} -> {}",
                self.owner,
                self.current.name(),
                next.name()
            );
            self.current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    impl BehaviorState for Light {
        fn name(self) -> &'static str {
            match self {
                Light::Red => "red",
                Light::Green => "green",
            }
        }
    }

    #[test]
    fn test_advance_keeps_state_on_none() {
        let mut fsm = StateMachine::new("light", Light::Red);
        assert_eq!(fsm.advance(|_| None), Light::Red);
        assert_eq!(fsm.advance(|_| Some(Light::Green)), Light::Green);
        assert_eq!(fsm.advance(|s| (s == Light::Red).then_some(Light::Green)), Light::Green);
    }

    #[test]
    fn test_select_first_match_wins() {
        let mut fsm = StateMachine::new("light", Light::Green);
        let priority = [Light::Red, Light::Green];
        assert_eq!(fsm.select(&priority, |_| true), Light::Red);
        assert_eq!(fsm.select(&priority, |s| s == Light::Green), Light::Green);
    }
}
