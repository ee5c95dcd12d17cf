//! Storage access for the benchmarked `records` table: schema reset plus
//! the narrow set of insert, upsert, and lookup operations the strategy
//! catalog measures.

use crate::record::{self, IdSequence, Record};
use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

const SCHEMA_SQL: &str = "
    DROP TABLE IF EXISTS records;
    CREATE TABLE records (
        id     INTEGER PRIMARY KEY,
        name   TEXT,
        prop1  TEXT,
        prop2  TEXT,
        prop3  TEXT,
        prop4  TEXT
    );
    CREATE UNIQUE INDEX records_name  ON records (name);
    CREATE UNIQUE INDEX records_prop1 ON records (prop1);
    CREATE UNIQUE INDEX records_prop2 ON records (prop2);
    CREATE UNIQUE INDEX records_prop3 ON records (prop3);
    CREATE UNIQUE INDEX records_prop4 ON records (prop4);
";

const INSERT_SQL: &str =
    "INSERT INTO records (id, name, prop1, prop2, prop3, prop4) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const UPSERT_SQL: &str =
    "INSERT OR REPLACE INTO records (id, name, prop1, prop2, prop3, prop4) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const FIND_SQL: &str =
    "SELECT id, name, prop1, prop2, prop3, prop4 FROM records WHERE id = ?1";

/// Drop and recreate the records table, then seed it with `size` rows
/// (ids `0..size`) in a single transaction. Returns the id sequence for
/// the configuration, positioned just past the baseline population.
pub fn reset_database(conn: &mut Connection, size: usize) -> Result<IdSequence> {
    conn.execute_batch(SCHEMA_SQL)?;

    let baseline = record::generate(0, size);
    let tx = conn.transaction()?;
    insert_batch(&tx, &baseline)?;
    tx.commit()?;

    Ok(IdSequence::starting_at(size as i64))
}

pub fn insert(conn: &Connection, rec: &Record) -> Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_SQL)?;
    stmt.execute(params![
        rec.id, rec.name, rec.prop1, rec.prop2, rec.prop3, rec.prop4
    ])?;
    Ok(())
}

pub fn insert_or_replace(conn: &Connection, rec: &Record) -> Result<()> {
    let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
    stmt.execute(params![
        rec.id, rec.name, rec.prop1, rec.prop2, rec.prop3, rec.prop4
    ])?;
    Ok(())
}

/// Bulk insert. The flag selects whether the batch itself opens a
/// transaction; without it each row commits on its own.
pub fn insert_all(conn: &mut Connection, records: &[Record], in_transaction: bool) -> Result<()> {
    if in_transaction {
        let tx = conn.transaction()?;
        insert_batch(&tx, records)?;
        tx.commit()?;
    } else {
        insert_batch(conn, records)?;
    }
    Ok(())
}

/// Cascade-aware bulk upsert: each record is upserted together with the
/// child rows its schema declares (none here, so the inner loop is empty).
pub fn insert_or_replace_all_with_children(
    conn: &mut Connection,
    records: &[Record],
    in_transaction: bool,
) -> Result<()> {
    if in_transaction {
        let tx = conn.transaction()?;
        upsert_tree(&tx, records)?;
        tx.commit()?;
    } else {
        upsert_tree(conn, records)?;
    }
    Ok(())
}

fn insert_batch(conn: &Connection, records: &[Record]) -> Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_SQL)?;
    for rec in records {
        stmt.execute(params![
            rec.id, rec.name, rec.prop1, rec.prop2, rec.prop3, rec.prop4
        ])?;
    }
    Ok(())
}

fn upsert_tree(conn: &Connection, records: &[Record]) -> Result<()> {
    let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
    for rec in records {
        stmt.execute(params![
            rec.id, rec.name, rec.prop1, rec.prop2, rec.prop3, rec.prop4
        ])?;
        for child in rec.children() {
            stmt.execute(params![
                child.id,
                child.name,
                child.prop1,
                child.prop2,
                child.prop3,
                child.prop4
            ])?;
        }
    }
    Ok(())
}

/// Point lookup by primary key.
pub fn find(conn: &Connection, id: i64) -> Result<Option<Record>> {
    let mut stmt = conn.prepare_cached(FIND_SQL)?;
    let rec = stmt.query_row(params![id], row_to_record).optional()?;
    Ok(rec)
}

/// Batched lookup: one `IN (…)` query over the given ids.
pub fn select_by_ids(conn: &Connection, ids: &[i64]) -> Result<Vec<Record>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, name, prop1, prop2, prop3, prop4 FROM records WHERE id IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), row_to_record)?;
    let mut out = Vec::with_capacity(ids.len());
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        name: row.get(1)?,
        prop1: row.get(2)?,
        prop2: row.get(3)?,
        prop3: row.get(4)?,
        prop4: row.get(5)?,
    })
}
