//! Pragma combinations: enumerates every subset of the base directive list
//! and applies a chosen subset to a fresh connection.

use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

/// Lazily yield every subset of `base` — 2^n in total, from the empty set
/// (mask 0) to the full list. Subset `i` contains element `j` iff bit `j`
/// of `i` is set, so subsets come out in ascending mask order and preserve
/// the base list's element order.
///
/// The space is exponential; the base list is expected to stay small
/// (≤ ~10 directives).
pub fn power_set<T: Clone>(base: &[T]) -> impl Iterator<Item = Vec<T>> + '_ {
    let n = base.len();
    (0..(1usize << n)).map(move |mask| {
        base.iter()
            .enumerate()
            .filter(|(j, _)| mask & (1 << j) != 0)
            .map(|(_, item)| item.clone())
            .collect()
    })
}

/// Apply each directive in order via scalar execution, discarding whatever
/// the engine echoes back. Pragmas answer with zero or one row depending on
/// the directive, so a missing row is not an error; a rejected directive is.
pub fn apply(conn: &Connection, pragmas: &[String]) -> Result<()> {
    for pragma in pragmas {
        let _echo: Option<Value> = conn
            .query_row(pragma, [], |row| row.get(0))
            .optional()?;
    }
    Ok(())
}
