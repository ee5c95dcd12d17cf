//! Thread-safe aggregation of the fastest observed run per strategy.
//!
//! The reference driver records sequentially, but every update is a
//! read-modify-write under one lock so a parallel driver could share a
//! `Fastest` without changes here.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// The minimum duration seen for one strategy and the pragma sets that
/// achieved it. Pragma sets are stored as copies, never as references into
/// driver state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestResult {
    pub duration: Duration,
    pub winners: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct Fastest {
    inner: Mutex<HashMap<&'static str, BestResult>>,
}

impl Fastest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measured run. A strictly smaller duration replaces the
    /// stored best and its winner list; on a tie the first-seen winner is
    /// kept (ties never append), so re-recording the same run is a no-op.
    pub fn record(&self, strategy: &'static str, pragmas: &[String], duration: Duration) {
        let mut inner = self.inner.lock().expect("fastest map lock poisoned");
        match inner.entry(strategy) {
            Entry::Vacant(slot) => {
                slot.insert(BestResult {
                    duration,
                    winners: vec![pragmas.to_vec()],
                });
            }
            Entry::Occupied(mut slot) => {
                let best = slot.get_mut();
                if duration < best.duration {
                    best.duration = duration;
                    best.winners = vec![pragmas.to_vec()];
                }
            }
        }
    }

    /// Best results so far, sorted by strategy name. Intended to be called
    /// once, after all experiments have finished.
    pub fn snapshot(&self) -> Vec<(&'static str, BestResult)> {
        let inner = self.inner.lock().expect("fastest map lock poisoned");
        let mut entries: Vec<_> = inner
            .iter()
            .map(|(name, best)| (*name, best.clone()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }
}
