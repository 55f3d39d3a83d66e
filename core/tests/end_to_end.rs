//! Whole-tick scenarios through the engine.

use econo_core::{
    catalog::{Career, Operation},
    config::SystemParams,
    engine::SimEngine,
    error::SimError,
    market::{Market, Resource},
    population::{Population, Unit, UnitIdSequencer},
    starter::starter_world,
    types::{FOOD, REPRODUCTION_KIT},
    world::World,
};

/// One farmer who grows a unit of food from nothing every tick.
fn farm(interest_rate: f64) -> World {
    let market = Market::new()
        .with_resource(FOOD, Resource::linear(1.0, 0.01))
        .with_resource(REPRODUCTION_KIT, Resource::linear(1000.0, 0.0));
    let farmer = Career::new("farmer", vec![Operation::new("grow", 1).product(FOOD, 1)]);
    let mut population = Population::new(UnitIdSequencer::new());
    population.insert(Unit::newborn("farmer_0001".into(), "farmer".into(), 0, 1));
    World {
        system: SystemParams {
            t: 0,
            interest_rate,
            min_balance: -100.0,
            max_age: 100,
            eat_every: 1,
            spawn_every: 2,
        },
        market,
        careers: [("farmer".to_string(), farmer)].into(),
        population,
    }
}

#[test]
fn farmer_eats_what_it_grows() {
    let mut engine = SimEngine::build_test("farm".into(), 1, farm(0.0)).unwrap();
    engine.run_ticks(1).unwrap();

    let world = engine.world();
    let unit = world.population.get("farmer_0001").unwrap();
    // Ate one food at 1.00 (delta 0), sold one at 1.00 (delta 1 - 1).
    assert_eq!(unit.balance, 0.0);
    assert_eq!(unit.busy, 1);
    assert_eq!(unit.age, 1);
    assert_eq!(world.market.delta(FOOD).unwrap(), 0);
    assert_eq!(world.system.t, 1);
}

#[test]
fn farmer_pays_interest_when_operating_in_debt() {
    let mut engine = SimEngine::build_test("farm-debt".into(), 1, farm(0.05)).unwrap();
    engine.run_ticks(1).unwrap();

    // After eating, the 1.00 debt is carried through the one-tick operation.
    let unit = engine.world().population.get("farmer_0001").unwrap();
    assert!((unit.balance - -0.05).abs() < 1e-12, "balance {}", unit.balance);
}

#[test]
fn tick_counter_continues_from_snapshot() {
    let mut world = farm(0.0);
    world.system.t = 41;
    let mut engine = SimEngine::build_test("resume-t".into(), 1, world).unwrap();
    engine.run_ticks(3).unwrap();
    assert_eq!(engine.clock.current_tick, 44);
    assert_eq!(engine.snapshot().system.t, 44);
}

#[test]
fn starter_economy_runs_a_long_time() {
    let mut engine = SimEngine::build_test("starter".into(), 3, starter_world()).unwrap();
    engine.run_ticks(250).unwrap();

    let world = engine.world();
    let counted: u64 = world.careers.values().map(|c| c.stats.population).sum();
    assert_eq!(counted as usize, world.population.len());
    for unit in world.population.iter() {
        assert!(unit.age < world.system.max_age);
        assert!(world.careers.contains_key(&unit.career));
    }
}

#[test]
fn direct_tick_requires_a_running_clock() {
    let mut engine = SimEngine::build_test("direct-tick".into(), 1, farm(0.0)).unwrap();
    assert!(matches!(engine.tick(), Err(SimError::Paused)));
    assert_eq!(engine.clock.current_tick, 0);

    engine.clock.resume();
    let events = engine.tick().unwrap();
    assert!(!events.is_empty());
    engine.tick().unwrap();
    engine.clock.pause();
    engine.run_ticks(3).unwrap();

    assert_eq!(engine.world().system.t, 5);
    assert_eq!(engine.store.event_count("direct-tick", "run_initialized").unwrap(), 1);
    assert_eq!(engine.store.event_count("direct-tick", "tick_started").unwrap(), 5);
}
