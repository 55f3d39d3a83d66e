//! Shared primitive types used across the entire simulation.

/// A simulation tick.
pub type Tick = u64;

/// Name of a tradeable resource in the market.
pub type ResourceName = String;

/// Name of a career (a bundle of operations).
pub type CareerName = String;

/// Unique unit identifier, `<career>_<seq>`.
pub type UnitName = String;

/// The canonical run identifier.
pub type RunId = String;

/// Resource eaten by every unit on its eat phase.
pub const FOOD: &str = "food";

/// Resource bought by a unit to reproduce.
pub const REPRODUCTION_KIT: &str = "reproduction_kit";
