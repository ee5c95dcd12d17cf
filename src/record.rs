//! Record generation: produces the rows inserted by the benchmark strategies.
//!
//! Identifiers are handed out sequentially and never reused within one
//! configuration's lifetime; see [`IdSequence`].

/// One row of the benchmarked table.
///
/// `id` is the primary key. `name` and the four optional properties each
/// carry their own unique index; generated rows leave the optional
/// properties NULL (SQLite unique indexes admit any number of NULLs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub prop1: Option<String>,
    pub prop2: Option<String>,
    pub prop3: Option<String>,
    pub prop4: Option<String>,
}

impl Record {
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            name: id.to_string(),
            prop1: None,
            prop2: None,
            prop3: None,
            prop4: None,
        }
    }

    /// Child rows persisted together with this record by the cascade-aware
    /// bulk upsert. The benchmark schema declares no related rows, so the
    /// cascade path always sees an empty slice.
    pub fn children(&self) -> &[Record] {
        &[]
    }
}

/// Generate `count` records with sequential ids starting at `start`.
pub fn generate(start: i64, count: usize) -> Vec<Record> {
    (start..start + count as i64).map(Record::with_id).collect()
}

/// Hands out the next primary key for generated records.
///
/// Reset to the baseline population size after every database reset, so
/// strategy runs within one configuration never collide on ids. Strategies
/// read [`IdSequence::current`] to generate their batch and call
/// [`IdSequence::advance`] only after the run succeeded.
#[derive(Debug, Clone, Copy)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    pub fn starting_at(next: i64) -> Self {
        Self { next }
    }

    pub fn current(&self) -> i64 {
        self.next
    }

    pub fn advance(&mut self, count: usize) {
        self.next += count as i64;
    }
}
