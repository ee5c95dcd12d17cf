//! The strategy catalog: every data-access pattern the harness measures.
//!
//! Each entry generates its own input (records or search ids) before the
//! timer starts, measures only the database calls, and advances the shared
//! id sequence only after a successful run, so repeated invocations within
//! one configuration never collide on primary keys. Persistence errors
//! propagate to the driver.

use crate::clock::Clock;
use crate::record::{self, IdSequence};
use crate::store;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use std::time::Duration;

/// Per-configuration state threaded through every strategy call.
#[derive(Debug)]
pub struct RunContext {
    pub ids: IdSequence,
    /// Baseline population size; search strategies draw ids below it.
    pub database_size: usize,
}

pub type StrategyFn =
    fn(&mut Connection, &mut RunContext, usize, &dyn Clock) -> Result<Duration>;

/// All strategies, in the order the driver runs them.
pub const CATALOG: &[(&str, StrategyFn)] = &[
    ("Insert", insert),
    ("InsertInTransaction", insert_in_transaction),
    ("InsertAll", insert_all),
    ("InsertAllInTransaction", insert_all_in_transaction),
    ("InsertOrReplace", insert_or_replace),
    ("InsertOrReplaceInTransaction", insert_or_replace_in_transaction),
    (
        "InsertOrReplaceAllWithChildren",
        insert_or_replace_all_with_children,
    ),
    (
        "InsertOrReplaceAllWithChildrenInTransaction",
        insert_or_replace_all_with_children_in_transaction,
    ),
    ("Search", search),
    ("SearchInTransaction", search_in_transaction),
    ("SearchBatch", search_batch),
    ("SearchBatchInTransaction", search_batch_in_transaction),
];

// ── Insert strategies ───────────────────────────────────────────────

fn insert(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    for rec in &records {
        store::insert(conn, rec)?;
    }
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    let tx = conn.transaction()?;
    for rec in &records {
        store::insert(&tx, rec)?;
    }
    tx.commit()?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_all(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    store::insert_all(conn, &records, false)?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_all_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    store::insert_all(conn, &records, true)?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_or_replace(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    for rec in &records {
        store::insert_or_replace(conn, rec)?;
    }
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_or_replace_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    let tx = conn.transaction()?;
    for rec in &records {
        store::insert_or_replace(&tx, rec)?;
    }
    tx.commit()?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_or_replace_all_with_children(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    store::insert_or_replace_all_with_children(conn, &records, false)?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

fn insert_or_replace_all_with_children_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let records = record::generate(ctx.ids.current(), count);

    let start = clock.now();
    store::insert_or_replace_all_with_children(conn, &records, true)?;
    let elapsed = clock.now() - start;

    ctx.ids.advance(count);
    Ok(elapsed)
}

// ── Search strategies ───────────────────────────────────────────────
//
// Lookups target the baseline population only, so they behave the same no
// matter how many insert strategies ran before them. Search runs never
// advance the id sequence.

fn draw_ids(seed: u64, upper: usize, count: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.gen_range(0..upper.max(1) as i64))
        .collect()
}

fn search(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let ids = draw_ids(0x5EA7C4_0001, ctx.database_size, count);

    let start = clock.now();
    for id in &ids {
        store::find(conn, *id)?;
    }
    Ok(clock.now() - start)
}

fn search_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let ids = draw_ids(0x5EA7C4_0002, ctx.database_size, count);

    let start = clock.now();
    let tx = conn.transaction()?;
    for id in &ids {
        store::find(&tx, *id)?;
    }
    tx.commit()?;
    Ok(clock.now() - start)
}

fn search_batch(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let ids = draw_ids(0x5EA7C4_0003, ctx.database_size, count);

    let start = clock.now();
    store::select_by_ids(conn, &ids)?;
    Ok(clock.now() - start)
}

fn search_batch_in_transaction(
    conn: &mut Connection,
    ctx: &mut RunContext,
    count: usize,
    clock: &dyn Clock,
) -> Result<Duration> {
    let ids = draw_ids(0x5EA7C4_0004, ctx.database_size, count);

    let start = clock.now();
    let tx = conn.transaction()?;
    store::select_by_ids(&tx, &ids)?;
    tx.commit()?;
    Ok(clock.now() - start)
}
