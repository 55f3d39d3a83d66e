//! Simulation events: what happened during a tick.
//!
//! The stepper returns these; the engine writes them to the run store.

use crate::types::{CareerName, RunId, Tick, UnitName};
use serde::{Deserialize, Serialize};

/// Variants are only appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick:       Tick,
        population: u64,
    },
    RunInitialized {
        run_id: RunId,
        seed:   u64,
    },

    // ── Lifecycle events ───────────────────────────
    UnitStarved {
        tick:       Tick,
        unit:       UnitName,
        career:     CareerName,
        balance:    f64,
        food_price: f64,
    },
    UnitDiedOfAge {
        tick:    Tick,
        unit:    UnitName,
        career:  CareerName,
        balance: f64,
    },
    UnitBorn {
        tick:      Tick,
        parent:    UnitName,
        child:     UnitName,
        career:    CareerName,
        kit_price: f64,
    },

    // ── Economic events ────────────────────────────
    OperationPerformed {
        tick:      Tick,
        unit:      UnitName,
        operation: String,
        profit:    f64,
    },
    CareerStatsComputed {
        tick:          Tick,
        career:        CareerName,
        total_balance: f64,
        total_age:     u64,
        population:    u64,
        avg_earnings:  f64,
    },
}

impl SimEvent {
    /// Stable name used for the event_type column of the event log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }         => "tick_started",
            Self::TickCompleted { .. }       => "tick_completed",
            Self::RunInitialized { .. }      => "run_initialized",
            Self::UnitStarved { .. }         => "unit_starved",
            Self::UnitDiedOfAge { .. }       => "unit_died_of_age",
            Self::UnitBorn { .. }            => "unit_born",
            Self::OperationPerformed { .. }  => "operation_performed",
            Self::CareerStatsComputed { .. } => "career_stats_computed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub tick:       Tick,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
