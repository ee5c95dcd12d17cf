//! SQLite Pragma Benchmark
//!
//! Measures the wall-clock cost of alternative insert and search strategies
//! against SQLite, repeated across every combination of a base list of
//! connection pragmas, and reports which combination is fastest for each
//! strategy.
//!
//! Each combination gets its own freshly created database file, seeded with
//! a fixed baseline population before the strategies run. Failures of a
//! single strategy or a single combination are recorded and never abort the
//! rest of the sweep.
//!
//! Run the harness: `cargo run --release`
//! Run tests: `cargo test`

pub mod clock;
pub mod driver;
pub mod fastest;
pub mod pragmas;
pub mod record;
pub mod report;
pub mod store;
pub mod strategy;
