//! The simulation engine: drives the stepper tick by tick.
//!
//! RULES:
//!   - One tick completes (every unit visited, stats recomputed) before
//!     the next begins.
//!   - All randomness flows through the RngBank, one stream per tick.
//!   - Every event is recorded in the run store, one transaction per tick.
//!   - A full snapshot is saved every SNAPSHOT_INTERVAL ticks.

use crate::{
    clock::SimClock,
    error::{SimError, SimResult},
    event::SimEvent,
    rng::{RngBank, SubsystemSlot},
    snapshot::{Snapshot, SNAPSHOT_INTERVAL},
    stepper,
    store::SimStore,
    types::{RunId, Tick},
    world::World,
};

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    world:        World,
    pub store:    SimStore,
    initialized:  bool,
}

impl SimEngine {
    /// The run must already be registered in `store` (`insert_run`).
    pub fn new(run_id: RunId, seed: u64, world: World, store: SimStore) -> Self {
        Self {
            clock:    SimClock::starting_at(world.system.t),
            rng_bank: RngBank::new(seed),
            world,
            store,
            run_id,
            initialized: false,
        }
    }

    /// Engine over an in-memory store with the run already registered.
    pub fn build_test(run_id: RunId, seed: u64, world: World) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, "0.1.0-test", 0)?;
        Ok(Self::new(run_id, seed, world, store))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advance one tick. This is the core simulation step.
    ///
    /// The engine starts paused: call `clock.resume()` first, or drive it
    /// through `run_ticks`. A paused engine returns `SimError::Paused`.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        if self.clock.paused {
            return Err(SimError::Paused);
        }
        self.ensure_initialized()?;

        let current_tick = self.clock.advance();
        let mut rng = self
            .rng_bank
            .for_subsystem_at_tick(SubsystemSlot::Reproduction, current_tick);

        let mut tick_events = vec![SimEvent::TickStarted { tick: current_tick }];
        tick_events.extend(stepper::step(current_tick, &mut self.world, &mut rng)?);
        self.world.system.t = current_tick;
        tick_events.push(SimEvent::TickCompleted {
            tick:       current_tick,
            population: self.world.population.len() as u64,
        });

        self.store.record_tick(&self.run_id, current_tick, &tick_events)?;

        if current_tick.is_multiple_of(SNAPSHOT_INTERVAL) {
            self.take_snapshot(current_tick)?;
        }

        Ok(tick_events)
    }

    /// Run n ticks in a loop.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        self.run_ticks_with(n, |_, _| {})
    }

    /// Run n ticks, calling `after_tick` once each tick has completed.
    pub fn run_ticks_with<F>(&mut self, n: u64, mut after_tick: F) -> SimResult<()>
    where
        F: FnMut(Tick, &World),
    {
        self.clock.resume();
        for _ in 0..n {
            let tick = match self.tick() {
                Ok(_) => self.clock.current_tick,
                Err(e) => {
                    self.clock.pause();
                    return Err(e);
                }
            };
            after_tick(tick, &self.world);
        }
        self.clock.pause();
        Ok(())
    }

    /// Full state in the five-section snapshot shape.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_world(&self.world)
    }

    /// Emit RunInitialized once so seed differences are observable.
    fn ensure_initialized(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        let init_event = SimEvent::RunInitialized {
            run_id: self.run_id.clone(),
            seed:   self.rng_bank.seed(),
        };
        self.store.record_tick(&self.run_id, self.clock.current_tick, &[init_event])?;
        self.initialized = true;
        Ok(())
    }

    fn take_snapshot(&self, tick: Tick) -> SimResult<()> {
        let json = self.snapshot().to_json()?;
        self.store.save_snapshot(&self.run_id, tick, &json)?;
        log::debug!("Snapshot saved at tick {tick}");
        Ok(())
    }
}
