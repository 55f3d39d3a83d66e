//! The complete in-memory model the stepper advances.

use crate::{
    catalog::Career,
    config::SystemParams,
    market::Market,
    population::Population,
    types::CareerName,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub system:     SystemParams,
    pub market:     Market,
    pub careers:    BTreeMap<CareerName, Career>,
    pub population: Population,
}

impl World {
    /// Recompute every career's stats from its surviving members.
    pub fn recompute_stats(&mut self) {
        for career in self.careers.values_mut() {
            career.stats = Default::default();
        }
        for unit in self.population.iter() {
            if let Some(career) = self.careers.get_mut(&unit.career) {
                career.stats.total_balance += unit.balance;
                career.stats.total_age += unit.age;
                career.stats.population += 1;
            }
        }
        for career in self.careers.values_mut() {
            career.stats.finish();
        }
    }
}
