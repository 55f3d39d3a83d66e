//! econo-core: a discrete-time agent-based economy.
//!
//! Units of different careers buy inputs from and sell outputs to a shared
//! market whose prices move with every trade. Each tick every unit eats,
//! maybe reproduces, picks the most profitable operation it can afford,
//! and ages. Per-career aggregates are recomputed after every tick.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod event;
pub mod market;
pub mod population;
pub mod profitability;
pub mod rng;
pub mod snapshot;
pub mod starter;
pub mod stepper;
pub mod store;
pub mod types;
pub mod world;
