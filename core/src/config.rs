//! Run-wide simulation parameters (the `system` snapshot section).

use crate::{
    error::{SimError, SimResult},
    types::Tick,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemParams {
    /// Last tick executed.
    pub t:             Tick,
    /// Per-tick interest on financed shortfalls and carried debt.
    pub interest_rate: f64,
    /// Floor no unit may drop below to eat, reproduce or operate.
    pub min_balance:   f64,
    pub max_age:       Tick,
    pub eat_every:     u64,
    pub spawn_every:   u64,
}

impl SystemParams {
    pub fn validate(&self) -> SimResult<()> {
        if self.eat_every == 0 {
            return Err(field("system.eat_every", "must be at least 1"));
        }
        if self.spawn_every == 0 {
            return Err(field("system.spawn_every", "must be at least 1"));
        }
        if !self.interest_rate.is_finite() {
            return Err(field("system.interest_rate", "must be finite"));
        }
        if !self.min_balance.is_finite() {
            return Err(field("system.min_balance", "must be finite"));
        }
        Ok(())
    }

    /// Parameters for unit tests: everyone eats every tick, nobody
    /// reproduces unless their phase says so.
    pub fn default_test() -> Self {
        Self {
            t:             0,
            interest_rate: 0.01,
            min_balance:   -100.0,
            max_age:       1000,
            eat_every:     1,
            spawn_every:   50,
        }
    }
}

pub(crate) fn field(path: &str, message: &str) -> SimError {
    SimError::InvalidField {
        path:    path.to_string(),
        message: message.to_string(),
    }
}
