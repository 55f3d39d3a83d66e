//! Simulation clock: owns the tick counter.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    /// Last tick fully executed.
    pub current_tick: Tick,
    pub paused:       bool,
}

impl SimClock {
    /// A paused clock resuming after `last_tick`.
    pub fn starting_at(last_tick: Tick) -> Self {
        Self {
            current_tick: last_tick,
            paused: true,
        }
    }

    /// Advance one tick. Returns the new tick number.
    /// Panics if called while paused; callers must check.
    pub fn advance(&mut self) -> Tick {
        assert!(!self.paused, "advance() called on paused clock");
        self.current_tick += 1;
        self.current_tick
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }
}
