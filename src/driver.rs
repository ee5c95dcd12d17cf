//! Experiment driver: visits every pragma combination exactly once and runs
//! the full strategy catalog against a fresh database file for each.
//!
//! Per configuration: open → apply pragmas → reset/seed → run strategies →
//! close. A strategy failure is recorded and the remaining strategies still
//! run; a setup failure aborts only that configuration.

use crate::clock::Clock;
use crate::fastest::Fastest;
use crate::pragmas;
use crate::report::{self, ConfigurationAbort, ExperimentLog, StrategyRun};
use crate::store;
use crate::strategy::{self, RunContext};
use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;

pub struct ExperimentConfig {
    /// Rows seeded before each configuration's strategies run.
    pub database_size: usize,
    /// Operation count passed to every strategy.
    pub operation_count: usize,
    /// Base directive list; the driver explores its power set.
    pub base_pragmas: Vec<String>,
    /// Directory receiving one uniquely named database file per
    /// configuration. Files are left behind on purpose.
    pub db_dir: PathBuf,
}

/// Run the whole experiment: every pragma subset, every strategy. Setup and
/// strategy failures are captured in the returned log rather than aborting
/// the sweep.
pub fn run(cfg: &ExperimentConfig, clock: &dyn Clock, fastest: &Fastest) -> ExperimentLog {
    let mut log = ExperimentLog::default();

    for current in pragmas::power_set(&cfg.base_pragmas) {
        report::print_configuration(&current);
        if let Err(err) = run_configuration(cfg, &current, clock, fastest, &mut log) {
            eprintln!("  configuration aborted: {err:#}");
            log.aborted.push(ConfigurationAbort {
                pragmas: current.clone(),
                error: format!("{err:#}"),
            });
        }
    }

    log
}

fn run_configuration(
    cfg: &ExperimentConfig,
    current: &[String],
    clock: &dyn Clock,
    fastest: &Fastest,
    log: &mut ExperimentLog,
) -> Result<()> {
    // Fresh file per configuration, never reused, so every subset starts
    // from clean storage rather than just a clean table.
    let path = cfg.db_dir.join(format!("{:032x}.db", rand::random::<u128>()));
    let mut conn = Connection::open(&path)?;

    pragmas::apply(&conn, current)?;

    let seed_start = clock.now();
    let ids = store::reset_database(&mut conn, cfg.database_size)?;
    eprintln!(
        "  seeded {} rows in {:.1} ms",
        cfg.database_size,
        (clock.now() - seed_start).as_secs_f64() * 1000.0
    );

    let mut ctx = RunContext {
        ids,
        database_size: cfg.database_size,
    };

    for &(name, run_strategy) in strategy::CATALOG {
        let outcome = run_strategy(&mut conn, &mut ctx, cfg.operation_count, clock)
            .map_err(|err| format!("{err:#}"));
        report::print_run(name, &outcome);
        if let Ok(duration) = &outcome {
            fastest.record(name, current, *duration);
        }
        log.runs.push(StrategyRun {
            strategy: name,
            pragmas: current.to_vec(),
            outcome,
        });
    }

    conn.close().map_err(|(_, err)| err)?;
    Ok(())
}
