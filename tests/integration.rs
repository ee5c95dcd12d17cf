//! Integration tests: pragma enumeration, database reset, strategy catalog
//! semantics, best-result aggregation, and the end-to-end driver.

use pragma_bench::clock::{FakeClock, MonotonicClock};
use pragma_bench::driver::{self, ExperimentConfig};
use pragma_bench::fastest::Fastest;
use pragma_bench::pragmas;
use pragma_bench::record::IdSequence;
use pragma_bench::store;
use pragma_bench::strategy::{self, RunContext, StrategyFn};
use rusqlite::Connection;
use std::collections::HashSet;
use std::time::Duration;

fn seeded(size: usize) -> (Connection, RunContext) {
    let mut conn = Connection::open_in_memory().expect("open");
    let ids = store::reset_database(&mut conn, size).expect("reset");
    (
        conn,
        RunContext {
            ids,
            database_size: size,
        },
    )
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))
        .unwrap()
}

fn pragma_set(items: &[&str]) -> Vec<String> {
    items.iter().map(|p| p.to_string()).collect()
}

fn catalog_fn(name: &str) -> StrategyFn {
    strategy::CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| *f)
        .expect("strategy registered in catalog")
}

// ── Pragma power set ────────────────────────────────────────────────

#[test]
fn power_set_yields_every_subset() {
    let base = pragma_set(&["A", "B", "C"]);
    let subsets: Vec<Vec<String>> = pragmas::power_set(&base).collect();

    assert_eq!(subsets.len(), 8);
    assert!(subsets[0].is_empty());
    assert_eq!(subsets[7], base);

    let distinct: HashSet<Vec<String>> = subsets.into_iter().collect();
    assert_eq!(distinct.len(), 8);
}

#[test]
fn power_set_follows_mask_order() {
    let base = pragma_set(&["A", "B"]);
    let subsets: Vec<Vec<String>> = pragmas::power_set(&base).collect();

    assert_eq!(
        subsets,
        vec![
            pragma_set(&[]),
            pragma_set(&["A"]),
            pragma_set(&["B"]),
            pragma_set(&["A", "B"]),
        ]
    );
}

#[test]
fn power_set_preserves_base_order_within_subsets() {
    let base = pragma_set(&["A", "B", "C"]);
    let subsets: Vec<Vec<String>> = pragmas::power_set(&base).collect();

    // Mask 0b101 selects the first and third directives, in base order.
    assert_eq!(subsets[5], pragma_set(&["A", "C"]));
}

#[test]
fn power_set_of_empty_base_is_single_empty_subset() {
    let base: Vec<String> = Vec::new();
    let subsets: Vec<Vec<String>> = pragmas::power_set(&base).collect();
    assert_eq!(subsets, vec![Vec::<String>::new()]);
}

// ── Database reset ──────────────────────────────────────────────────

#[test]
fn reset_seeds_exact_population() {
    let (conn, ctx) = seeded(25);

    assert_eq!(row_count(&conn), 25);
    assert_eq!(ctx.ids.current(), 25);

    let (min, max): (i64, i64) = conn
        .query_row("SELECT MIN(id), MAX(id) FROM records", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(min, 0);
    assert_eq!(max, 24);
}

#[test]
fn reset_discards_previous_contents() {
    let (mut conn, mut ctx) = seeded(10);

    let insert = catalog_fn("Insert");
    insert(&mut conn, &mut ctx, 5, &MonotonicClock).expect("insert");
    assert_eq!(row_count(&conn), 15);

    let ids = store::reset_database(&mut conn, 10).expect("reset again");
    assert_eq!(row_count(&conn), 10);
    assert_eq!(ids.current(), 10);
}

// ── Strategy catalog ────────────────────────────────────────────────

#[test]
fn insert_advances_counter_and_never_collides() {
    let (mut conn, mut ctx) = seeded(10);
    let insert = catalog_fn("Insert");

    insert(&mut conn, &mut ctx, 5, &MonotonicClock).expect("first run");
    assert_eq!(ctx.ids.current(), 15);
    assert_eq!(row_count(&conn), 15);

    insert(&mut conn, &mut ctx, 5, &MonotonicClock).expect("second run");
    assert_eq!(ctx.ids.current(), 20);
    assert_eq!(row_count(&conn), 20);
}

#[test]
fn full_catalog_runs_cleanly_after_one_reset() {
    let (mut conn, mut ctx) = seeded(50);

    for &(name, run) in strategy::CATALOG {
        run(&mut conn, &mut ctx, 5, &MonotonicClock)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
    }

    let inserting = strategy::CATALOG
        .iter()
        .filter(|(name, _)| name.starts_with("Insert"))
        .count();
    assert_eq!(ctx.ids.current(), 50 + (inserting * 5) as i64);
    assert_eq!(row_count(&conn), 50 + (inserting * 5) as i64);
}

#[test]
fn insert_collision_propagates_and_leaves_counter_untouched() {
    let (mut conn, mut ctx) = seeded(10);
    ctx.ids = IdSequence::starting_at(0);

    let insert = catalog_fn("Insert");
    let err = insert(&mut conn, &mut ctx, 5, &MonotonicClock);
    assert!(err.is_err(), "expected a uniqueness violation");
    assert_eq!(ctx.ids.current(), 0);
}

#[test]
fn upsert_overwrites_existing_ids_without_error() {
    let (mut conn, mut ctx) = seeded(10);
    ctx.ids = IdSequence::starting_at(0);

    let upsert = catalog_fn("InsertOrReplace");
    upsert(&mut conn, &mut ctx, 5, &MonotonicClock).expect("upsert over existing rows");
    assert_eq!(row_count(&conn), 10);
    assert_eq!(ctx.ids.current(), 5);
}

#[test]
fn cascading_upsert_handles_mixed_new_and_existing_ids() {
    let (mut conn, mut ctx) = seeded(10);
    ctx.ids = IdSequence::starting_at(5);

    let upsert = catalog_fn("InsertOrReplaceAllWithChildren");
    upsert(&mut conn, &mut ctx, 10, &MonotonicClock).expect("cascading upsert");

    // Ids 5..10 overwrote existing rows, 10..15 are new.
    assert_eq!(row_count(&conn), 15);
    assert_eq!(ctx.ids.current(), 15);
}

#[test]
fn search_strategies_leave_state_untouched() {
    let (mut conn, mut ctx) = seeded(30);

    for name in [
        "Search",
        "SearchInTransaction",
        "SearchBatch",
        "SearchBatchInTransaction",
    ] {
        let run = catalog_fn(name);
        run(&mut conn, &mut ctx, 10, &MonotonicClock)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert_eq!(ctx.ids.current(), 30, "{name} advanced the id sequence");
        assert_eq!(row_count(&conn), 30, "{name} changed the row count");
    }
}

#[test]
fn fake_clock_measures_exactly_one_step_per_strategy() {
    let (mut conn, mut ctx) = seeded(10);
    let clock = FakeClock::with_step(Duration::from_millis(1));

    for &(name, run) in strategy::CATALOG {
        let duration = run(&mut conn, &mut ctx, 3, &clock)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert_eq!(duration, Duration::from_millis(1), "{name}");
    }
}

// ── Store lookups ───────────────────────────────────────────────────

#[test]
fn find_returns_seeded_row_or_none() {
    let (conn, _) = seeded(5);

    let rec = store::find(&conn, 3).expect("find").expect("row exists");
    assert_eq!(rec.id, 3);
    assert_eq!(rec.name, "3");
    assert_eq!(rec.prop1, None);

    assert!(store::find(&conn, 999).expect("find").is_none());
}

#[test]
fn select_by_ids_returns_only_matches() {
    let (conn, _) = seeded(10);

    let rows = store::select_by_ids(&conn, &[1, 3, 5, 999]).expect("select");
    assert_eq!(rows.len(), 3);

    assert!(store::select_by_ids(&conn, &[]).expect("select").is_empty());
}

// ── Best-result aggregation ─────────────────────────────────────────

#[test]
fn fastest_keeps_minimum_duration() {
    let fastest = Fastest::new();
    fastest.record("Insert", &pragma_set(&["A"]), Duration::from_millis(5));
    fastest.record("Insert", &pragma_set(&["B"]), Duration::from_millis(3));
    fastest.record("Insert", &pragma_set(&["C"]), Duration::from_millis(7));

    let snapshot = fastest.snapshot();
    assert_eq!(snapshot.len(), 1);
    let (name, best) = &snapshot[0];
    assert_eq!(*name, "Insert");
    assert_eq!(best.duration, Duration::from_millis(3));
    assert_eq!(best.winners, vec![pragma_set(&["B"])]);
}

#[test]
fn fastest_tie_keeps_first_seen_winner() {
    let fastest = Fastest::new();
    fastest.record("Insert", &pragma_set(&["A"]), Duration::from_millis(3));
    fastest.record("Insert", &pragma_set(&["B"]), Duration::from_millis(3));

    let snapshot = fastest.snapshot();
    let (_, best) = &snapshot[0];
    assert_eq!(best.winners, vec![pragma_set(&["A"])]);
}

#[test]
fn fastest_recording_is_idempotent() {
    let fastest = Fastest::new();
    fastest.record("Insert", &pragma_set(&["A"]), Duration::from_millis(3));
    let once = fastest.snapshot();

    fastest.record("Insert", &pragma_set(&["A"]), Duration::from_millis(3));
    assert_eq!(fastest.snapshot(), once);
}

#[test]
fn fastest_leaderboard_matches_reference_scenario() {
    // Four configurations over ["A", "B"], recorded in enumeration order.
    let fastest = Fastest::new();
    fastest.record("Insert", &pragma_set(&[]), Duration::from_millis(5));
    fastest.record("Insert", &pragma_set(&["A"]), Duration::from_millis(3));
    fastest.record("Insert", &pragma_set(&["B"]), Duration::from_millis(3));
    fastest.record("Insert", &pragma_set(&["A", "B"]), Duration::from_millis(7));

    let snapshot = fastest.snapshot();
    let (_, best) = &snapshot[0];
    assert_eq!(best.duration, Duration::from_millis(3));
    assert_eq!(best.winners, vec![pragma_set(&["A"])]);
}

#[test]
fn fastest_snapshot_is_sorted_by_strategy_name() {
    let fastest = Fastest::new();
    fastest.record("SearchBatch", &pragma_set(&[]), Duration::from_millis(2));
    fastest.record("Insert", &pragma_set(&[]), Duration::from_millis(1));

    let names: Vec<&str> = fastest.snapshot().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["Insert", "SearchBatch"]);
}

// ── End-to-end driver ───────────────────────────────────────────────

fn small_config(dir: &std::path::Path, base_pragmas: &[&str]) -> ExperimentConfig {
    ExperimentConfig {
        database_size: 20,
        operation_count: 5,
        base_pragmas: pragma_set(base_pragmas),
        db_dir: dir.to_path_buf(),
    }
}

#[test]
fn driver_explores_every_combination() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = small_config(dir.path(), &["PRAGMA synchronous = OFF"]);
    let fastest = Fastest::new();

    let log = driver::run(&cfg, &MonotonicClock, &fastest);

    assert!(log.aborted.is_empty());
    assert_eq!(log.runs.len(), 2 * strategy::CATALOG.len());
    assert!(log.runs.iter().all(|r| r.outcome.is_ok()));
    assert_eq!(fastest.snapshot().len(), strategy::CATALOG.len());

    // One database file per explored configuration, left behind.
    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 2);
}

#[test]
fn driver_tie_break_makes_first_configuration_the_winner() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = small_config(dir.path(), &["PRAGMA synchronous = OFF"]);
    let fastest = Fastest::new();
    let clock = FakeClock::with_step(Duration::from_millis(1));

    let log = driver::run(&cfg, &clock, &fastest);
    assert!(log.aborted.is_empty());

    // Every run measures exactly one step, so the empty set — enumerated
    // first — wins every strategy.
    for (name, best) in fastest.snapshot() {
        assert_eq!(best.duration, Duration::from_millis(1), "{name}");
        assert_eq!(best.winners, vec![Vec::<String>::new()], "{name}");
    }
}

#[test]
fn invalid_pragma_aborts_only_matching_subsets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = small_config(
        dir.path(),
        &["PRAGMA synchronous = OFF", "definitely not a directive"],
    );
    let fastest = Fastest::new();

    let log = driver::run(&cfg, &MonotonicClock, &fastest);

    // Two of the four subsets contain the broken directive.
    assert_eq!(log.aborted.len(), 2);
    assert!(log
        .aborted
        .iter()
        .all(|a| a.pragmas.contains(&"definitely not a directive".to_string())));

    // The two clean subsets still ran the full catalog.
    assert_eq!(log.runs.len(), 2 * strategy::CATALOG.len());
    assert!(log.runs.iter().all(|r| r.outcome.is_ok()));
    assert_eq!(fastest.snapshot().len(), strategy::CATALOG.len());
}
