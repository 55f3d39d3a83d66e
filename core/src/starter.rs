//! A small self-sustaining economy used by `econo new` and by tests.
//!
//! Farmers grow food, lumberjacks cut wood, smiths turn wood into tools,
//! and tools multiply farm and forest output.

use crate::{
    catalog::{Career, Operation},
    config::SystemParams,
    market::{Market, Resource},
    population::{Population, Unit, UnitIdSequencer},
    types::{FOOD, REPRODUCTION_KIT},
    world::World,
};
use std::collections::BTreeMap;

pub fn starter_world() -> World {
    let market = Market::new()
        .with_resource(FOOD, Resource::linear(1.0, 0.01))
        .with_resource(REPRODUCTION_KIT, Resource::exponential(20.0, 1.01))
        .with_resource("wood", Resource::linear(2.0, 0.02))
        .with_resource("tools", Resource::exponential(10.0, 1.005));

    let careers: BTreeMap<_, _> = [
        Career::new("farmer", vec![
            Operation::new("harvest", 1).product(FOOD, 3),
            Operation::new("orchard", 3).cost("tools", 1).product(FOOD, 12),
        ]),
        Career::new("lumberjack", vec![
            Operation::new("chop", 1).product("wood", 2),
            Operation::new("fell", 2).cost("tools", 1).product("wood", 8),
        ]),
        Career::new("smith", vec![
            Operation::new("forge", 2).cost("wood", 3).product("tools", 1),
        ]),
    ]
    .into_iter()
    .map(|c| (c.name.clone(), c))
    .collect();

    let mut sequencer = UnitIdSequencer::new();
    let mut seed_units = Vec::new();
    for (career, count) in [("farmer", 4u64), ("lumberjack", 3), ("smith", 2)] {
        for i in 0..count {
            let name = sequencer.next_name(career);
            let mut unit = Unit::newborn(name, career.to_string(), i % 5, (i * 17) % 60);
            unit.balance = 10.0;
            seed_units.push(unit);
        }
    }
    let mut population = Population::new(sequencer);
    for unit in seed_units {
        population.insert(unit);
    }

    World {
        system: SystemParams {
            t:             0,
            interest_rate: 0.001,
            min_balance:   -50.0,
            max_age:       400,
            eat_every:     5,
            spawn_every:   60,
        },
        market,
        careers,
        population,
    }
}
