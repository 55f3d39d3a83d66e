//! Operation catalog: careers and the production operations they offer.
//!
//! Operations are immutable once loaded. Career stats are derived every
//! tick from the live population and are never authoritative state.

use crate::types::{CareerName, ResourceName, Tick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A timed conversion of input resources into output resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name:     String,
    /// Resources bought from the market and consumed.
    pub costs:    BTreeMap<ResourceName, i64>,
    /// Resources produced and sold into the market.
    pub products: BTreeMap<ResourceName, i64>,
    /// Ticks the unit stays busy afterwards. Always >= 1 once validated.
    pub duration: Tick,
}

impl Operation {
    pub fn new(name: &str, duration: Tick) -> Self {
        Self {
            name: name.to_string(),
            costs: BTreeMap::new(),
            products: BTreeMap::new(),
            duration,
        }
    }

    pub fn cost(mut self, resource: &str, qty: i64) -> Self {
        self.costs.insert(resource.to_string(), qty);
        self
    }

    pub fn product(mut self, resource: &str, qty: i64) -> Self {
        self.products.insert(resource.to_string(), qty);
        self
    }

    /// Every resource this operation touches.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceName> {
        self.costs.keys().chain(self.products.keys())
    }
}

/// Rolling per-career aggregates, recomputed after every tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CareerStats {
    pub total_balance: f64,
    pub total_age:     u64,
    pub population:    u64,
    pub avg_earnings:  f64,
}

impl CareerStats {
    /// Close the aggregate. The `+ 1` keeps empty careers at zero.
    pub fn finish(&mut self) {
        self.avg_earnings = self.total_balance / (self.total_age as f64 + 1.0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Career {
    pub name:       CareerName,
    /// Kept sorted by name; the decision policy relies on this order.
    operations:     Vec<Operation>,
    pub stats:      CareerStats,
}

impl Career {
    pub fn new(name: &str, mut operations: Vec<Operation>) -> Self {
        operations.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            name: name.to_string(),
            operations,
            stats: CareerStats::default(),
        }
    }

    pub fn with_stats(mut self, stats: CareerStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// The career a newborn joins: highest `avg_earnings`, ties to the
/// name that sorts first.
pub fn most_lucrative(careers: &BTreeMap<CareerName, Career>) -> Option<&Career> {
    careers.values().fold(None, |best: Option<&Career>, c| match best {
        Some(b) if b.stats.avg_earnings >= c.stats.avg_earnings => Some(b),
        _ => Some(c),
    })
}
