//! econo: headless runner for the econo economic simulation.
//!
//! Usage:
//!   econo new --output economy.json
//!   econo run economy.json overrides.json --ticks 365 --report-every 30 --output out.json
//!   econo run economy.json --ticks 1000 --seed 7 --db run.db

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use econo_core::{
    engine::SimEngine,
    snapshot::{read_documents, Snapshot},
    starter::starter_world,
    store::SimStore,
    types::Tick,
    world::World,
};
use std::path::PathBuf;

/// Tool for generating or simulating economies
#[derive(Parser, Debug)]
#[command(name = "econo", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new economic description
    New {
        /// Write the snapshot here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Simulate an economy for a specified number of steps
    Run {
        /// Snapshot documents, merged left to right (none = starter economy)
        docs: Vec<PathBuf>,

        /// Number of ticks to simulate
        #[arg(long, short = 'n', default_value_t = 100)]
        ticks: u64,

        /// Random seed for phase assignment
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print a career report every K ticks (0 = only at the end)
        #[arg(long, default_value_t = 0)]
        report_every: u64,

        /// Write the final snapshot here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// SQLite database for the event log (default: in memory)
        #[arg(long)]
        db: Option<String>,

        /// Run identifier recorded in the database
        #[arg(long)]
        run_id: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::New { output } => {
            let snapshot = Snapshot::from_world(&starter_world());
            write_output(output.as_ref(), &snapshot.to_json()?)
        }
        Command::Run { docs, ticks, seed, report_every, output, db, run_id } => {
            let snapshot = if docs.is_empty() {
                log::info!("no snapshot documents given; using the starter economy");
                Snapshot::from_world(&starter_world())
            } else {
                Snapshot::from_value(read_documents(&docs)?)?
            };
            let world = snapshot.into_world()?;

            let store = match db.as_deref() {
                Some(path) => SimStore::open(path)?,
                None => SimStore::in_memory()?,
            };
            store.migrate()?;

            let run_id = run_id.unwrap_or_else(|| format!("run-{}", uuid::Uuid::new_v4()));
            store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), chrono::Utc::now().timestamp())?;

            eprintln!("econo run");
            eprintln!("  run_id:  {run_id}");
            eprintln!("  seed:    {seed}");
            eprintln!("  start t: {}", world.system.t);
            eprintln!("  ticks:   {ticks}");
            eprintln!();

            let mut engine = SimEngine::new(run_id, seed, world, store);
            engine.run_ticks_with(ticks, |tick, world| {
                if report_every > 0 && tick.is_multiple_of(report_every) {
                    print_report(tick, world);
                }
            })?;

            print_report(engine.clock.current_tick, engine.world());
            print_summary(&engine)?;

            write_output(output.as_ref(), &engine.snapshot().to_json()?)
        }
    }
}

fn print_report(tick: Tick, world: &World) {
    eprintln!("=== t={tick} | units: {} ===", world.population.len());
    for career in world.careers.values() {
        let s = &career.stats;
        eprintln!(
            "  {:<16} pop {:>5} | balance {:>12.2} | age {:>8} | avg earnings {:>9.4}",
            career.name, s.population, s.total_balance, s.total_age, s.avg_earnings
        );
        log::info!(
            "t={tick} career={} population={} avg_earnings={:.4}",
            career.name, s.population, s.avg_earnings
        );
    }
}

fn print_summary(engine: &SimEngine) -> Result<()> {
    let run_id = &engine.run_id;
    eprintln!();
    eprintln!("=== RUN SUMMARY ===");
    eprintln!("  final tick:  {}", engine.clock.current_tick);
    eprintln!("  births:      {}", engine.store.event_count(run_id, "unit_born")?);
    eprintln!("  starvations: {}", engine.store.event_count(run_id, "unit_starved")?);
    eprintln!("  old age:     {}", engine.store.event_count(run_id, "unit_died_of_age")?);
    for (name, res) in engine.world().market.resources() {
        eprintln!(
            "  {:<16} delta {:>7} | ask {:>10.4} | bid {:>10.4}",
            name,
            res.delta,
            res.unit_price(res.delta),
            res.unit_price(res.delta - 1),
        );
    }
    Ok(())
}

fn write_output(path: Option<&PathBuf>, json: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Cannot write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
