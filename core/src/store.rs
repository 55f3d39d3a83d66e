//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine hands it events and snapshots; nothing else executes SQL.

use crate::{
    catalog::CareerStats,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    types::Tick,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the simulation database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests and by default in the runner).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str, started_at: i64) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    /// Persist one tick's events in a single transaction. Career stats
    /// events are also written to the career_stats table.
    pub fn record_tick(&self, run_id: &str, tick: Tick, events: &[SimEvent]) -> SimResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut insert_event = tx.prepare_cached(
                "INSERT INTO event_log (run_id, tick, event_type, payload)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut insert_stats = tx.prepare_cached(
                "INSERT INTO career_stats
                    (run_id, tick, career, total_balance, total_age, population, avg_earnings)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for event in events {
                insert_event.execute(params![
                    run_id,
                    tick as i64,
                    event.type_name(),
                    serde_json::to_string(event)?,
                ])?;
                if let SimEvent::CareerStatsComputed {
                    career, total_balance, total_age, population, avg_earnings, ..
                } = event
                {
                    insert_stats.execute(params![
                        run_id,
                        tick as i64,
                        career,
                        total_balance,
                        *total_age as i64,
                        *population as i64,
                        avg_earnings,
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn events_for_tick(&self, run_id: &str, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, tick, event_type, payload
             FROM event_log WHERE run_id = ?1 AND tick = ?2
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![run_id, tick as i64], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                run_id:     row.get(1)?,
                tick:       row.get::<_, i64>(2)? as u64,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Career stats ───────────────────────────────────────────

    pub fn career_stats_history(&self, run_id: &str, career: &str) -> SimResult<Vec<(Tick, CareerStats)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tick, total_balance, total_age, population, avg_earnings
             FROM career_stats WHERE run_id = ?1 AND career = ?2
             ORDER BY tick ASC"
        )?;
        let rows = stmt.query_map(params![run_id, career], |row| {
            Ok((
                row.get::<_, i64>(0)? as u64,
                CareerStats {
                    total_balance: row.get(1)?,
                    total_age:     row.get::<_, i64>(2)? as u64,
                    population:    row.get::<_, i64>(3)? as u64,
                    avg_earnings:  row.get(4)?,
                },
            ))
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, tick: Tick, state_json: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshot (run_id, tick, state_json) VALUES (?1, ?2, ?3)",
            params![run_id, tick as i64, state_json],
        )?;
        Ok(())
    }

    pub fn latest_snapshot_before(
        &self, run_id: &str, tick: Tick
    ) -> SimResult<Option<(Tick, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tick, state_json FROM snapshot
             WHERE run_id = ?1 AND tick <= ?2
             ORDER BY tick DESC LIMIT 1"
        )?;
        let result = stmt.query_row(params![run_id, tick as i64], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?))
        }).optional()?;
        Ok(result)
    }
}
