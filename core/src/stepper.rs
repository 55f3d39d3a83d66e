//! The stepper: advances every unit by one tick.
//!
//! ORDER (fixed, load-bearing, never changed):
//!   Units are visited poorest first, from a list of names taken at the
//!   start of the tick. Each unit then runs, in order:
//!     1. Eat        (starves and leaves the population if unaffordable)
//!     2. Reproduce  (skipped if unaffordable; newborns act next tick)
//!     3. Act        (decision policy if idle, otherwise count down busy)
//!     4. Age        (leaves the population at max_age)
//!   Career stats are recomputed once every unit has been visited.
//!
//! Each unit's purchases move the prices every later unit sees within
//! the same tick, so this loop must stay sequential.

use crate::{
    catalog::most_lucrative,
    decision::choose,
    error::{SimError, SimResult},
    event::SimEvent,
    rng::SubsystemRng,
    types::{Tick, FOOD, REPRODUCTION_KIT},
    world::World,
};

/// Run one tick over `world`. Returns every event emitted, in order.
pub fn step(tick: Tick, world: &mut World, rng: &mut SubsystemRng) -> SimResult<Vec<SimEvent>> {
    let mut events = Vec::new();

    for name in world.population.names_by_balance() {
        step_unit(tick, world, &name, rng, &mut events)?;
    }

    world.recompute_stats();
    for career in world.careers.values() {
        events.push(SimEvent::CareerStatsComputed {
            tick,
            career:        career.name.clone(),
            total_balance: career.stats.total_balance,
            total_age:     career.stats.total_age,
            population:    career.stats.population,
            avg_earnings:  career.stats.avg_earnings,
        });
    }

    Ok(events)
}

fn step_unit(
    tick: Tick,
    world: &mut World,
    name: &str,
    rng: &mut SubsystemRng,
    events: &mut Vec<SimEvent>,
) -> SimResult<()> {
    let World { system, market, careers, population } = world;

    let Some(unit) = population.get_mut(name) else {
        return Ok(());
    };

    // 1. Eat
    if unit.eats_now(system.eat_every) {
        let food_price = market.ask(FOOD, 1)?;
        if unit.balance - food_price < system.min_balance {
            let balance = unit.balance;
            let career = unit.career.clone();
            population.remove(name);
            log::info!(
                "tick={tick} population: {name} ({career}) starved at balance {balance:.2}, food {food_price:.2}"
            );
            events.push(SimEvent::UnitStarved {
                tick,
                unit: name.to_string(),
                career,
                balance,
                food_price,
            });
            return Ok(());
        }
        unit.balance -= food_price;
        market.buy(FOOD, 1)?;
    }

    // 2. Reproduce
    if unit.spawns_now(system.spawn_every) {
        let kit_price = market.ask(REPRODUCTION_KIT, 1)?;
        if unit.balance - kit_price >= system.min_balance {
            unit.balance -= kit_price;
            market.buy(REPRODUCTION_KIT, 1)?;

            let target = most_lucrative(careers).ok_or(SimError::NoCareers)?.name.clone();
            let child = population.spawn(&target, system.eat_every, system.spawn_every, rng);
            log::info!("tick={tick} population: {name} gives birth to {child}");
            events.push(SimEvent::UnitBorn {
                tick,
                parent: name.to_string(),
                child,
                career: target,
                kit_price,
            });
        }
    }

    let Some(unit) = population.get_mut(name) else {
        return Ok(());
    };

    // 3. Act
    if unit.busy == 0 {
        let career = careers.get(&unit.career).ok_or_else(|| SimError::UnknownCareer {
            context: format!("unit '{name}'"),
            career:  unit.career.clone(),
        })?;
        let decision = choose(
            market,
            career.operations(),
            system.interest_rate,
            unit.balance,
            system.min_balance,
            unit.remaining_time(system.max_age),
        )?;

        unit.balance += decision.profit;
        if let Some(op) = decision.operation {
            for (resource, qty) in &op.costs {
                market.buy(resource, *qty)?;
            }
            for (resource, qty) in &op.products {
                market.sell(resource, *qty)?;
            }
            unit.busy += op.duration;
            events.push(SimEvent::OperationPerformed {
                tick,
                unit:      name.to_string(),
                operation: op.name.clone(),
                profit:    decision.profit,
            });
        }
    } else {
        unit.busy -= 1;
    }

    // 4. Age
    unit.age += 1;
    if unit.age >= system.max_age {
        let balance = unit.balance;
        let career = unit.career.clone();
        population.remove(name);
        log::debug!("tick={tick} population: {name} ({career}) died of old age");
        events.push(SimEvent::UnitDiedOfAge {
            tick,
            unit: name.to_string(),
            career,
            balance,
        });
    }

    Ok(())
}
