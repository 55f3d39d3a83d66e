//! Unit population: the agents and the per-career name sequencer.
//!
//! The population exclusively owns every unit record. Units are keyed by
//! name in an ordered map so every traversal is deterministic.

use crate::{
    rng::SubsystemRng,
    types::{CareerName, Tick, UnitName},
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub name:        UnitName,
    pub age:         Tick,
    /// Ticks left before the unit may act again.
    pub busy:        Tick,
    pub career:      CareerName,
    pub balance:     f64,
    pub eat_phase:   u64,
    pub spawn_phase: u64,
}

impl Unit {
    /// A newborn: no age, no money, no work queued.
    pub fn newborn(name: UnitName, career: CareerName, eat_phase: u64, spawn_phase: u64) -> Self {
        Self {
            name,
            age: 0,
            busy: 0,
            career,
            balance: 0.0,
            eat_phase,
            spawn_phase,
        }
    }

    pub fn eats_now(&self, eat_every: u64) -> bool {
        self.age % eat_every == self.eat_phase
    }

    pub fn spawns_now(&self, spawn_every: u64) -> bool {
        self.age % spawn_every == self.spawn_phase
    }

    /// Ticks left before the unit reaches `max_age`. Negative when a
    /// loaded unit is already past it.
    pub fn remaining_time(&self, max_age: Tick) -> i64 {
        max_age as i64 - self.age as i64
    }
}

/// Per-career counters used to mint unit names. Persisted with the
/// snapshot so names stay unique across save/load cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitIdSequencer {
    next: BTreeMap<CareerName, u64>,
}

impl UnitIdSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counters(next: BTreeMap<CareerName, u64>) -> Self {
        Self { next }
    }

    pub fn counters(&self) -> &BTreeMap<CareerName, u64> {
        &self.next
    }

    /// Next name for `career`: `<career>_0001`, `<career>_0002`, ...
    pub fn next_name(&mut self, career: &str) -> UnitName {
        let counter = self.next.entry(career.to_string()).or_insert(0);
        *counter += 1;
        format!("{career}_{:04}", *counter)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    units:     BTreeMap<UnitName, Unit>,
    sequencer: UnitIdSequencer,
}

impl Population {
    pub fn new(sequencer: UnitIdSequencer) -> Self {
        Self { units: BTreeMap::new(), sequencer }
    }

    pub fn insert(&mut self, unit: Unit) {
        self.units.insert(unit.name.clone(), unit);
    }

    pub fn remove(&mut self, name: &str) -> Option<Unit> {
        self.units.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Unit> {
        self.units.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn sequencer(&self) -> &UnitIdSequencer {
        &self.sequencer
    }

    /// Names of every live unit, poorest first. Equal balances keep
    /// name order (stable sort over the ordered map).
    pub fn names_by_balance(&self) -> Vec<UnitName> {
        let mut order: Vec<(&UnitName, f64)> =
            self.units.iter().map(|(name, u)| (name, u.balance)).collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));
        order.into_iter().map(|(name, _)| name.clone()).collect()
    }

    /// Add a newborn to `career` with random eat/spawn phases.
    pub fn spawn(
        &mut self,
        career: &str,
        eat_every: u64,
        spawn_every: u64,
        rng: &mut SubsystemRng,
    ) -> UnitName {
        let mut name = self.sequencer.next_name(career);
        while self.units.contains_key(&name) {
            name = self.sequencer.next_name(career);
        }
        let eat_phase = rng.next_u64_below(eat_every);
        let spawn_phase = rng.next_u64_below(spawn_every);
        self.insert(Unit::newborn(name.clone(), career.to_string(), eat_phase, spawn_phase));
        name
    }
}
