//! Standalone harness runner that prints per-run timings and the final
//! fastest-operations report.
//!
//! The baseline population and per-strategy operation count are compiled-in
//! constants; both can be overridden without rebuilding:
//!
//!   PRAGMA_BENCH_DB_SIZE=50000 PRAGMA_BENCH_OPS=1000 cargo run --release
//!
//! One database file is created per explored pragma combination in the
//! current directory and intentionally left behind for inspection.

use pragma_bench::clock::MonotonicClock;
use pragma_bench::driver::{self, ExperimentConfig};
use pragma_bench::fastest::Fastest;
use pragma_bench::report;
use pragma_bench::strategy;

const DATABASE_SIZE: usize = 20_000;
const OPERATION_COUNT: usize = 500;

/// The directives whose power set the driver explores. Order matters only
/// for display and subset enumeration.
const BASE_PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode = OFF",
    "PRAGMA synchronous = OFF",
    "PRAGMA locking_mode = EXCLUSIVE",
];

fn env_override(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("  Warning: {name}={raw} is not a number, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}

fn main() {
    let database_size = env_override("PRAGMA_BENCH_DB_SIZE", DATABASE_SIZE);
    let operation_count = env_override("PRAGMA_BENCH_OPS", OPERATION_COUNT);

    println!("Running SQLite pragma benchmark...");
    println!("  Baseline rows:        {database_size}");
    println!("  Ops per strategy:     {operation_count}");
    println!("  Strategies:           {}", strategy::CATALOG.len());
    println!("  Pragma combinations:  {}", 1usize << BASE_PRAGMAS.len());

    let cfg = ExperimentConfig {
        database_size,
        operation_count,
        base_pragmas: BASE_PRAGMAS.iter().map(|p| p.to_string()).collect(),
        db_dir: std::env::current_dir().expect("resolve working directory"),
    };

    let clock = MonotonicClock;
    let fastest = Fastest::new();
    let log = driver::run(&cfg, &clock, &fastest);

    report::print_report(&log, &fastest);
}
